use opengl_lessons::lessons::depth::DepthTest;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<DepthTest>()
}
