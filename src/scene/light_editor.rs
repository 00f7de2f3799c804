//! Keyboard editing of a [`Light`]. Tab picks the field, Left/Right the
//! component, Up/Down step it. Every change is logged.

use glam::Vec3;
use sdl2::keyboard::Keycode;

use crate::scene::Light;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightField {
    Position,
    Direction,
    Cutoff,
    Distance,
    Ambient,
    Diffuse,
    Specular,
}

impl LightField {
    pub fn next(self) -> LightField {
        match self {
            LightField::Position => LightField::Direction,
            LightField::Direction => LightField::Cutoff,
            LightField::Cutoff => LightField::Distance,
            LightField::Distance => LightField::Ambient,
            LightField::Ambient => LightField::Diffuse,
            LightField::Diffuse => LightField::Specular,
            LightField::Specular => LightField::Position,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LightField::Position => "position",
            LightField::Direction => "direction",
            LightField::Cutoff => "cutoff",
            LightField::Distance => "distance",
            LightField::Ambient => "ambient",
            LightField::Diffuse => "diffuse",
            LightField::Specular => "specular",
        }
    }

    fn component_count(self) -> usize {
        match self {
            LightField::Distance => 1,
            LightField::Cutoff => 2,
            _ => 3,
        }
    }

    fn step(self) -> f32 {
        match self {
            LightField::Position => 0.25,
            LightField::Direction => 0.1,
            LightField::Cutoff => 1.0,
            LightField::Distance => 5.0,
            LightField::Ambient | LightField::Diffuse | LightField::Specular => 0.05,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightEditor {
    field: LightField,
    component: usize,
}

impl Default for LightEditor {
    fn default() -> LightEditor {
        LightEditor {
            field: LightField::Position,
            component: 0,
        }
    }
}

impl LightEditor {
    pub fn field(&self) -> LightField {
        self.field
    }

    pub fn component(&self) -> usize {
        self.component
    }

    /// Applies one key press. Returns false for keys the editor doesn't use.
    pub fn handle_key(&mut self, light: &mut Light, key: Keycode) -> bool {
        let count = self.field.component_count();
        match key {
            Keycode::Tab => {
                self.field = self.field.next();
                self.component = 0;
                log::info!("editing light {}", self.field.name());
            }
            Keycode::Right => {
                self.component = (self.component + 1) % count;
                log::info!("editing light {}[{}]", self.field.name(), self.component);
            }
            Keycode::Left => {
                self.component = (self.component + count - 1) % count;
                log::info!("editing light {}[{}]", self.field.name(), self.component);
            }
            Keycode::Up => self.step(light, 1.0),
            Keycode::Down => self.step(light, -1.0),
            _ => return false,
        }
        true
    }

    fn step(&self, light: &mut Light, sign: f32) {
        let delta = sign * self.field.step();
        let i = self.component;
        match self.field {
            LightField::Position => {
                light.position[i] += delta;
                log::info!("light position: {}", light.position);
            }
            LightField::Direction => {
                let mut direction = light.direction;
                direction[i] += delta;
                // A zero direction has no orientation to look along.
                if direction.length_squared() > 1e-6 {
                    light.direction = direction;
                }
                log::info!("light direction: {}", light.direction);
            }
            LightField::Cutoff => {
                let max = if i == 0 { 180.0 } else { 90.0 };
                light.cutoff[i] = (light.cutoff[i] + delta).clamp(0.0, max);
                log::info!("light cutoff: {}", light.cutoff);
            }
            LightField::Distance => {
                light.distance = (light.distance + delta).max(1.0);
                log::info!("light distance: {}", light.distance);
            }
            LightField::Ambient => step_color(&mut light.ambient, i, delta, "ambient"),
            LightField::Diffuse => step_color(&mut light.diffuse, i, delta, "diffuse"),
            LightField::Specular => step_color(&mut light.specular, i, delta, "specular"),
        }
    }
}

fn step_color(color: &mut Vec3, i: usize, delta: f32, name: &str) {
    color[i] = (color[i] + delta).clamp(0.0, 1.0);
    log::info!("light {name}: {color}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(editor: &mut LightEditor, light: &mut Light, keys: &[Keycode]) {
        for &key in keys {
            assert!(editor.handle_key(light, key));
        }
    }

    #[test]
    fn tab_visits_every_field() {
        let mut editor = LightEditor::default();
        let mut light = Light::default();
        let mut seen = vec![editor.field()];
        for _ in 0..7 {
            press(&mut editor, &mut light, &[Keycode::Tab]);
            seen.push(editor.field());
        }
        assert_eq!(LightField::Position, seen[7]);
        seen.sort_by_key(|field| field.name());
        seen.dedup();
        assert_eq!(7, seen.len());
        assert_eq!(Light::default(), light);
    }

    #[test]
    fn up_and_down_step_the_selected_component() {
        let mut editor = LightEditor::default();
        let mut light = Light::default();
        press(&mut editor, &mut light, &[Keycode::Right, Keycode::Up, Keycode::Up]);
        assert_eq!(Vec3::new(2.0, 4.5, 4.0), light.position);
        press(&mut editor, &mut light, &[Keycode::Left, Keycode::Left, Keycode::Down]);
        assert_eq!(2, editor.component());
        assert_eq!(Vec3::new(2.0, 4.5, 3.75), light.position);
    }

    #[test]
    fn values_stay_in_range() {
        let mut editor = LightEditor::default();
        let mut light = Light::default();
        // Cutoff: inner angle tops out at 180 degrees.
        press(&mut editor, &mut light, &[Keycode::Tab, Keycode::Tab]);
        light.cutoff.x = 179.5;
        press(&mut editor, &mut light, &[Keycode::Up]);
        assert_eq!(180.0, light.cutoff.x);
        // Distance never drops below one unit.
        press(&mut editor, &mut light, &[Keycode::Tab]);
        light.distance = 3.0;
        press(&mut editor, &mut light, &[Keycode::Down]);
        assert_eq!(1.0, light.distance);
        // Colors stay within 0..=1.
        press(&mut editor, &mut light, &[Keycode::Tab, Keycode::Up, Keycode::Up]);
        assert!(light.ambient.abs_diff_eq(Vec3::new(0.2, 0.1, 0.1), 1e-6));
        light.ambient.x = 0.98;
        press(&mut editor, &mut light, &[Keycode::Up]);
        assert_eq!(1.0, light.ambient.x);
    }

    #[test]
    fn direction_never_becomes_zero() {
        let mut editor = LightEditor::default();
        let mut light = Light {
            direction: Vec3::new(0.0, -0.1, 0.0),
            ..Light::default()
        };
        press(&mut editor, &mut light, &[Keycode::Tab, Keycode::Right, Keycode::Up]);
        assert_eq!(Vec3::new(0.0, -0.1, 0.0), light.direction);
        press(&mut editor, &mut light, &[Keycode::Down]);
        assert!((light.direction.y + 0.2).abs() < 1e-6);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut editor = LightEditor::default();
        let mut light = Light::default();
        assert!(!editor.handle_key(&mut light, Keycode::W));
        assert_eq!(LightEditor::default(), editor);
        assert_eq!(Light::default(), light);
    }
}
