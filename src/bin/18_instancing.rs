use opengl_lessons::lessons::instancing::Instancing;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<Instancing>()
}
