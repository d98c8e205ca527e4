use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        PaddingConfig2d, Relu,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::domain::image::IMAGE_SIDE;

// Channel widths of the two convolution blocks and the hidden
// classification layer. Input is always [N, 3, 32, 32].
const CONV1_CHANNELS: usize = 32;
const CONV2_CHANNELS: usize = 64;
const HIDDEN_DIM:     usize = 128;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct CnnModelConfig {
    /// Output dimension — must equal the class-label count
    pub num_classes: usize,

    #[config(default = 0.25)]
    pub dropout: f64,
}

impl CnnModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CnnModel<B> {
        let conv1 = Conv2dConfig::new([3, CONV1_CHANNELS], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let conv2 = Conv2dConfig::new([CONV1_CHANNELS, CONV2_CHANNELS], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let pool = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();

        // Two 2× poolings shrink 32×32 down to 8×8
        let feature_dim = CONV2_CHANNELS * (IMAGE_SIDE / 4) * (IMAGE_SIDE / 4);
        let fc1 = LinearConfig::new(feature_dim, HIDDEN_DIM).init(device);
        let fc2 = LinearConfig::new(HIDDEN_DIM, self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();

        CnnModel {
            conv1, conv2, pool,
            fc1, fc2, dropout,
            activation: Relu::new(),
        }
    }
}

#[derive(Module, Debug)]
pub struct CnnModel<B: Backend> {
    pub conv1:      Conv2d<B>,
    pub conv2:      Conv2d<B>,
    pub pool:       MaxPool2d,
    pub fc1:        Linear<B>,
    pub fc2:        Linear<B>,
    pub dropout:    Dropout,
    pub activation: Relu,
}

impl<B: Backend> CnnModel<B> {
    /// images: [batch, 3, 32, 32] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.pool.forward(self.activation.forward(self.conv1.forward(images)));
        let x = self.pool.forward(self.activation.forward(self.conv2.forward(x)));

        // [batch, 64, 8, 8] → [batch, 4096]
        let x = x.flatten::<2>(1, 3);

        let x = self.dropout.forward(self.activation.forward(self.fc1.forward(x)));
        self.fc2.forward(x)
    }

    /// Forward pass plus cross-entropy loss against the targets.
    /// Returns the logits too so the caller can compute accuracy
    /// without a second forward pass.
    pub fn forward_loss(
        &self,
        images:  Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(images);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new()
            .init(&logits.device());
        let loss = ce.forward(logits.clone(), targets);
        (loss, logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::NdArray;

    #[test]
    fn test_forward_shape() {
        let device = NdArrayDevice::default();
        let model: CnnModel<NdArray> = CnnModelConfig::new(10).init(&device);

        let input = Tensor::<NdArray, 4>::zeros([2, 3, 32, 32], &device);
        let logits = model.forward(input);

        assert_eq!(logits.dims(), [2, 10]);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let cfg = CnnModelConfig::new(10);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: CnnModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.num_classes, 10);
    }
}
