use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::renderer::program::Program;

/// Polynomial fits (in 1/distance) of the linear and quadratic attenuation
/// terms for a light that should fade out at a given distance.
const LINEAR_COEFFICIENTS: Vec4 = Vec4::new(8.4523112e-05, 4.4712582, -1.8516388, 33.955811);
const QUADRATIC_COEFFICIENTS: Vec4 = Vec4::new(-7.6103583e-04, 9.0120201, -11.6185, 100.00464);

/// Returns the (constant, linear, quadratic) attenuation coefficients for a
/// light reaching roughly `distance` units.
pub fn attenuation_coefficients(distance: f32) -> Vec3 {
    let d = 1.0 / distance;
    let dvec = Vec4::new(1.0, d, d * d, d * d * d);
    let kl = LINEAR_COEFFICIENTS.dot(dvec);
    let kq = QUADRATIC_COEFFICIENTS.dot(dvec);
    Vec3::new(1.0, kl.max(0.0), (kq * kq).max(0.0))
}

/// A point, spot or directional light, as edited by the lessons and fed to
/// the `light` uniform struct of the lighting shaders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub directional: bool,
    pub position: Vec3,
    pub direction: Vec3,
    /// Inner cone angle and the falloff angle past it, in degrees.
    pub cutoff: Vec2,
    pub distance: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for Light {
    fn default() -> Light {
        Light {
            directional: false,
            position: Vec3::new(2.0, 4.0, 4.0),
            direction: Vec3::new(-0.5, -1.5, -1.0),
            cutoff: Vec2::new(50.0, 5.0),
            distance: 150.0,
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
        }
    }
}

impl Light {
    /// Cosines of the inner and outer cone angles, which is what the
    /// fragment shaders compare against.
    pub fn cutoff_cosines(&self) -> Vec2 {
        Vec2::new(
            self.cutoff.x.to_radians().cos(),
            (self.cutoff.x + self.cutoff.y).to_radians().cos(),
        )
    }

    pub fn light_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, Vec3::Y)
    }

    /// An orthographic box for directional lights, otherwise a perspective
    /// frustum wide enough to cover the spot light cone twice.
    pub fn light_projection(&self) -> Mat4 {
        if self.directional {
            Mat4::orthographic_rh_gl(-10.0, 10.0, -10.0, 10.0, 1.0, 30.0)
        } else {
            Mat4::perspective_rh_gl(
                ((self.cutoff.x + self.cutoff.y) * 2.0).to_radians(),
                1.0,
                1.0,
                20.0,
            )
        }
    }

    pub fn light_transform(&self) -> Mat4 {
        self.light_projection() * self.light_view()
    }

    /// Sets the `light.*` uniforms. The program must be in use.
    pub fn apply(&self, program: &Program) {
        program.set_uniform("light.directional", self.directional);
        program.set_uniform("light.position", self.position);
        program.set_uniform("light.direction", self.direction);
        program.set_uniform("light.cutoff", self.cutoff_cosines());
        program.set_uniform(
            "light.attenuation",
            attenuation_coefficients(self.distance),
        );
        program.set_uniform("light.ambient", self.ambient);
        program.set_uniform("light.diffuse", self.diffuse);
        program.set_uniform("light.specular", self.specular);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(expected: f32, actual: f32, epsilon: f32) {
        assert!(
            (expected - actual).abs() <= epsilon,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn attenuation_matches_reference_table() {
        // The classic table lists (0.7, 1.8) for a range of 7; the fit lands
        // within a few thousandths of it.
        let coefficients = attenuation_coefficients(7.0);
        assert_eq!(1.0, coefficients.x);
        assert_close(0.7, coefficients.y, 2e-3);
        assert_close(1.8, coefficients.z, 3e-3);

        let coefficients = attenuation_coefficients(150.0);
        assert_close(0.029821, coefficients.y, 1e-5);
        assert_close(0.0034612, coefficients.z, 1e-6);
    }

    #[test]
    fn attenuation_is_never_negative() {
        for distance in [1.0, 10.0, 100.0, 1000.0, 3000.0, 1e6] {
            let coefficients = attenuation_coefficients(distance);
            assert!(coefficients.y >= 0.0 && coefficients.z >= 0.0);
        }
    }

    #[test]
    fn cutoff_is_converted_to_cosines() {
        let cosines = Light::default().cutoff_cosines();
        assert_close(50f32.to_radians().cos(), cosines.x, 1e-6);
        assert_close(55f32.to_radians().cos(), cosines.y, 1e-6);
    }

    #[test]
    fn light_view_looks_along_direction() {
        let light = Light::default();
        let view = light.light_view();
        assert!(view
            .transform_point3(light.position)
            .abs_diff_eq(Vec3::ZERO, 1e-5));
        let ahead = view.transform_point3(light.position + light.direction.normalize() * 3.0);
        assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-4));
    }

    #[test]
    fn projection_depends_on_light_kind() {
        let mut light = Light::default();
        assert_eq!(
            Mat4::perspective_rh_gl(110f32.to_radians(), 1.0, 1.0, 20.0),
            light.light_projection()
        );

        light.directional = true;
        let corner = light
            .light_projection()
            .project_point3(Vec3::new(10.0, 10.0, -1.0));
        assert!(corner.abs_diff_eq(Vec3::new(1.0, 1.0, -1.0), 1e-5));
    }
}
