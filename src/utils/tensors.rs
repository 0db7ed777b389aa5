use std::path::Path;

use burn::{
    module::Param,
    nn::LinearRecord,
    tensor::{backend::Backend, Data, ElementConversion, Shape, Tensor},
};
use candle_core::{safetensors, DType};

/// Load a pretrained linear layer (such as a classification head) from a safetensors file
///
/// Hugging Face stores `{prefix}.weight` as [d_output, d_input], while Burn expects
/// [d_input, d_output], so the weight is transposed on the way in.
pub fn load_linear<B: Backend>(
    model_file: &Path,
    prefix: &str,
    device: &B::Device,
) -> anyhow::Result<LinearRecord<B>> {
    let tensors = safetensors::load(model_file, &candle_core::Device::Cpu)
        .map_err(|e| anyhow!("Unable to read safetensors file: {}", e))?;

    let weight_key = format!("{}.weight", prefix);
    let bias_key = format!("{}.bias", prefix);

    let weight = tensors
        .get(&weight_key)
        .ok_or_else(|| anyhow!("Missing tensor {} in {}", weight_key, model_file.display()))?;

    let (d_output, d_input) = match weight.dims() {
        [d_output, d_input] => (*d_output, *d_input),
        dims => {
            return Err(anyhow!(
                "Expected a 2D tensor for {}, found shape {:?}",
                weight_key,
                dims
            ))
        }
    };

    let weight: Tensor<B, 2> = Tensor::from_data(
        Data::new(to_floats::<B>(weight)?, Shape::new([d_output, d_input])),
        device,
    )
    .transpose();

    let bias = match tensors.get(&bias_key) {
        Some(bias) => {
            let values = to_floats::<B>(bias)?;
            if values.len() != d_output {
                return Err(anyhow!(
                    "Expected {} values for {}, found {}",
                    d_output,
                    bias_key,
                    values.len()
                ));
            }

            let bias: Tensor<B, 1> =
                Tensor::from_data(Data::new(values, Shape::new([d_output])), device);

            Some(Param::from(bias))
        }
        None => None,
    };

    Ok(LinearRecord {
        weight: Param::from(weight),
        bias,
    })
}

fn to_floats<B: Backend>(tensor: &candle_core::Tensor) -> anyhow::Result<Vec<B::FloatElem>> {
    let values = tensor
        .to_dtype(DType::F32)
        .and_then(|t| t.flatten_all())
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(|e| anyhow!("Unable to convert tensor: {}", e))?;

    Ok(values.into_iter().map(|v| v.elem()).collect())
}
