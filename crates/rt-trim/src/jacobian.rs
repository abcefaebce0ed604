//! Finite difference Jacobian of the 3-DOF pitch response.

use nalgebra::Matrix3;
use rt_core::Vec3;

/// Compute the Jacobian with central differences straddling `x`.
///
/// For each column j, evaluates f at `x - h/2 e_j` then `x + h/2 e_j` and
/// takes `(f+ - f-) / h`. Perturbations never accumulate across columns: every
/// probe starts again from `x`. Exactly six evaluations, in column order,
/// which keeps collective reductions inside `f` in step across partitions.
pub fn central_difference_jacobian<F>(x: &Vec3, mut f: F, step: f64) -> Matrix3<f64>
where
    F: FnMut(&Vec3) -> Vec3,
{
    let mut jac = Matrix3::zeros();

    for j in 0..3 {
        let mut x_probe = *x;

        x_probe[j] -= step / 2.0;
        let f_minus = f(&x_probe);

        x_probe[j] += step;
        let f_plus = f(&x_probe);

        jac.set_column(j, &((f_plus - f_minus) / step));
    }

    jac
}
