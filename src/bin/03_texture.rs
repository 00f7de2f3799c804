use opengl_lessons::lessons::texture::TexturedQuad;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<TexturedQuad>()
}
