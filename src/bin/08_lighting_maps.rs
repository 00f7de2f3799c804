use opengl_lessons::lessons::lighting_maps::LightingMaps;

fn main() -> anyhow::Result<()> {
    opengl_lessons::app::run::<LightingMaps>()
}
