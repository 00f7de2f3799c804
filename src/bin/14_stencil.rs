use opengl_lessons::lessons::stencil::StencilTest;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<StencilTest>()
}
