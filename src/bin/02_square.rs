use opengl_lessons::lessons::square::Square;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<Square>()
}
