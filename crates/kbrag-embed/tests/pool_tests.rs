use candle_core::{DType, Device, Tensor};
use kbrag_embed::masked_mean_l2;

#[test]
fn masked_mean_l2_skips_padding() {
    let dev = Device::Cpu;
    // Two tokens with hidden dim 4; second token is padding.
    let h = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], (1, 2, 4), &dev).expect("hidden");
    let mask = Tensor::from_slice(&[1u32, 0u32], (1, 2), &dev).expect("mask");
    let out: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).expect("pool").to_vec2().expect("vec2");
    let n = (1.0f32 + 4.0 + 9.0 + 16.0).sqrt();
    for (a, b) in out[0].iter().zip([1.0 / n, 2.0 / n, 3.0 / n, 4.0 / n]) {
        assert!((a - b).abs() < 1e-5, "a={} b={}", a, b);
    }
}

#[test]
fn masked_mean_l2_averages_each_row() {
    let dev = Device::Cpu;
    let h = Tensor::from_slice(&[1.0f32, 0.0, 3.0, 0.0, 0.0, 2.0, 0.0, 4.0], (2, 2, 2), &dev).expect("hidden");
    let mask = Tensor::from_slice(&[1.0f32, 1.0, 1.0, 1.0], (2, 2), &dev).expect("mask").to_dtype(DType::F32).expect("f32");
    let out: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).expect("pool").to_vec2().expect("vec2");
    // Row 0 mean [2, 0] -> [1, 0]; row 1 mean [0, 3] -> [0, 1].
    assert!((out[0][0] - 1.0).abs() < 1e-5 && out[0][1].abs() < 1e-5);
    assert!(out[1][0].abs() < 1e-5 && (out[1][1] - 1.0).abs() < 1e-5);
}

#[test]
fn rejects_wrong_rank() {
    let dev = Device::Cpu;
    let h = Tensor::zeros((2, 4), DType::F32, &dev).expect("hidden");
    let mask = Tensor::ones((2, 4), DType::F32, &dev).expect("mask");
    assert!(masked_mean_l2(&h, &mask).is_err());
}
