use opengl_lessons::lessons::directional::Directional;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<Directional>()
}
