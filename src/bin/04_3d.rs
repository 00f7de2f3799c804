use opengl_lessons::lessons::cubes::Cubes;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<Cubes>()
}
