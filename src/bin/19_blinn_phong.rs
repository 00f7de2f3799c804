use opengl_lessons::lessons::blinn_phong::BlinnPhong;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<BlinnPhong>()
}
