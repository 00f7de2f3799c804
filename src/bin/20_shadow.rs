use opengl_lessons::lessons::shadow::Shadows;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<Shadows>()
}
