use anyhow::{ensure, Result};
use candle_core::{DType, Tensor};

/// Mean of the unmasked token states, then L2-normalized: `[B,T,H] -> [B,H]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    ensure!(hidden.rank() == 3, "hidden shape must be [B,T,H], got {:?}", hidden.dims());
    let (batch, _, hidden_dim) = hidden.dims3()?;

    let mask = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?;
    let mask_b = mask.unsqueeze(2)?.broadcast_as(hidden.shape())?;
    let sum = hidden.mul(&mask_b)?.sum(1)?;
    let lengths = mask.sum_keepdim(1)?.clamp(1e-9, f64::MAX)?;
    let mean = sum.broadcast_div(&lengths)?;

    let eps = match hidden.dtype() { DType::F16 | DType::BF16 => 1e-6, _ => 1e-12 };
    let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(eps, f64::MAX)?;
    let out = mean.broadcast_div(&norm)?;
    ensure!(out.dims() == [batch, hidden_dim], "pooled shape {:?}", out.dims());
    Ok(out)
}
