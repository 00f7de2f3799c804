use opengl_lessons::lessons::camera::CameraControl;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<CameraControl>()
}
