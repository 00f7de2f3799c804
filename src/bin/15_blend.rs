use opengl_lessons::lessons::blend::Blending;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<Blending>()
}
