use ndarray::Array1;

pub fn relu(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| if v > 0.0 { v } else { 0.0 })
}

pub fn softmax(x: &Array1<f64>) -> Array1<f64> {
    let max_x = x.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let exp_x = x.mapv(|v| (v - max_x).exp());
    let sum_exp_x = exp_x.sum();
    exp_x / sum_exp_x
}
