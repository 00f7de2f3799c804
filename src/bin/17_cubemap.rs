use opengl_lessons::lessons::cubemap::Cubemap;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<Cubemap>()
}
