use opengl_lessons::lessons::triangle::Triangle;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<Triangle>()
}
