use opengl_lessons::lessons::spot::Spot;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<Spot>()
}
