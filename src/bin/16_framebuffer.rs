use opengl_lessons::lessons::framebuffer::PostProcessing;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<PostProcessing>()
}
