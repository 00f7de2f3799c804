use opengl_lessons::lessons::normal_map::NormalMapping;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<NormalMapping>()
}
