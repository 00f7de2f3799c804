use opengl_lessons::lessons::model::ModelLoading;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<ModelLoading>()
}
