use std::ops::{Deref, DerefMut};

use glam::{Mat3, Mat4, Vec3};

/// LIFO stack of composed model-view matrices.
///
/// The stack always holds at least the base matrix it was created with.
/// Nested transforms are opened through [`TransformStack::scoped`], which
/// duplicates the current top and pops it again when the scope is dropped,
/// so a push can never outlive its frame.
#[derive(Debug, Clone)]
pub struct TransformStack {
    matrices: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// Creates a stack holding a single identity matrix.
    pub fn new() -> Self {
        Self::with_base(Mat4::IDENTITY)
    }

    /// Creates a stack with an explicit base matrix.
    pub fn with_base(base: Mat4) -> Self {
        Self {
            matrices: vec![base],
        }
    }

    /// Number of matrices currently on the stack.
    pub fn depth(&self) -> usize {
        self.matrices.len()
    }

    /// Returns the current composed matrix.
    pub fn top(&self) -> Mat4 {
        *self.matrices.last().expect("transform stack is empty")
    }

    /// Opens a nested scope whose top starts as a copy of the current top.
    pub fn scoped(&mut self) -> TransformScope<'_> {
        let top = self.top();
        self.scoped_matrix(top)
    }

    /// Opens a nested scope with an explicit top matrix.
    ///
    /// Used by the skybox pass, which replaces the view with its
    /// rotation-only basis instead of composing onto it.
    pub fn scoped_matrix(&mut self, matrix: Mat4) -> TransformScope<'_> {
        self.matrices.push(matrix);
        TransformScope { stack: self }
    }

    /// Composes a translation onto the top matrix.
    pub fn translate(&mut self, offset: Vec3) {
        self.multiply(Mat4::from_translation(offset));
    }

    /// Composes a scale onto the top matrix.
    pub fn scale(&mut self, factors: Vec3) {
        self.multiply(Mat4::from_scale(factors));
    }

    /// Right-multiplies the top matrix by `matrix`.
    pub fn multiply(&mut self, matrix: Mat4) {
        let top = self.matrices.last_mut().expect("transform stack is empty");
        *top = *top * matrix;
    }

    fn pop(&mut self) {
        if self.matrices.len() <= 1 {
            panic!("transform stack pop without matching push");
        }
        self.matrices.pop();
    }
}

/// RAII guard for a nested transform frame; pops on drop.
#[derive(Debug)]
pub struct TransformScope<'a> {
    stack: &'a mut TransformStack,
}

impl Deref for TransformScope<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}

/// Strips the translation column from a view matrix, keeping rotation only.
///
/// The skybox is drawn through this basis so it rotates with the camera but
/// never moves when the camera translates.
pub fn rotation_only(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn scope_duplicates_top_and_pops_on_drop() {
        let base = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mut stack = TransformStack::with_base(base);
        {
            let mut scope = stack.scoped();
            assert_eq!(scope.depth(), 2);
            assert_eq!(scope.top(), base);
            scope.translate(Vec3::X);
            assert_ne!(scope.top(), base);
        }
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), base);
    }

    #[test]
    fn nested_scopes_restore_in_order() {
        let mut stack = TransformStack::new();
        {
            let mut outer = stack.scoped();
            outer.scale(Vec3::splat(2.0));
            let outer_top = outer.top();
            {
                let mut inner = outer.scoped();
                inner.translate(Vec3::Y);
                assert_eq!(inner.depth(), 3);
            }
            assert_eq!(outer.top(), outer_top);
        }
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    fn composition_matches_glam() {
        let mut stack = TransformStack::new();
        let mut scope = stack.scoped();
        scope.translate(Vec3::new(-2.0, 1.0, -3.0));
        scope.scale(Vec3::splat(20.0));
        let expected = Mat4::from_translation(Vec3::new(-2.0, 1.0, -3.0))
            * Mat4::from_scale(Vec3::splat(20.0));
        assert!(scope.top().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn rotation_only_drops_translation() {
        let view = Mat4::look_at_rh(Vec3::new(10.0, -4.0, 25.0), Vec3::ZERO, Vec3::Y);
        let rotation = rotation_only(view);
        assert_eq!(rotation.w_axis, Vec4::W);
        // Rotation basis itself is untouched.
        assert!(rotation.x_axis.truncate().abs_diff_eq(view.x_axis.truncate(), 1e-6));
        assert!(rotation.y_axis.truncate().abs_diff_eq(view.y_axis.truncate(), 1e-6));
        assert!(rotation.z_axis.truncate().abs_diff_eq(view.z_axis.truncate(), 1e-6));
    }

    #[test]
    #[should_panic(expected = "pop without matching push")]
    fn popping_the_base_panics() {
        let mut stack = TransformStack::new();
        stack.pop();
    }
}
