use image::DynamicImage;
use ort::{
    execution_providers::CPUExecutionProvider,
    session::{
        Session,
        builder::{GraphOptimizationLevel, SessionBuilder},
    },
};
use snafu::ResultExt;
use std::path::Path;

use crate::error::{OrtInitSnafu, PlancalError};

pub trait Model {
    type Input;
    type Output;
    type Config;

    const INPUT_NAME: &'static str;
    const OUTPUT_NAME: &'static str;
    const MODEL_NAME: &'static str;

    /// Location of the onnx file on disk.
    fn path(&self) -> &Path;
    fn config(&self) -> &Self::Config;
}

pub trait OnnxSession<M: Model> {
    type Output;
    type Extra;

    fn preprocess(&self, image: &DynamicImage) -> Result<M::Input, PlancalError>;

    fn postprocess(
        &self,
        output: M::Output,
        extra: Self::Extra,
    ) -> Result<Self::Output, PlancalError>;

    fn infer(
        &mut self,
        input: M::Input,
        input_name: &str,
        output_name: &str,
    ) -> Result<M::Output, PlancalError>;

    fn run(
        &mut self,
        image: &DynamicImage,
        extra: Self::Extra,
    ) -> Result<Self::Output, PlancalError> {
        let input = self.preprocess(image)?;

        let output = self.infer(input, M::INPUT_NAME, M::OUTPUT_NAME)?;

        self.postprocess(output, extra)
    }
}

/// Loads the model file into a session built by [`session_builder`].
pub fn commit<M: Model>(session: SessionBuilder, model: &M) -> Result<Session, PlancalError> {
    session
        .commit_from_file(model.path())
        .context(OrtInitSnafu {
            stage: format!("commit-{}", M::MODEL_NAME),
        })
}

/// common session builder
pub fn session_builder() -> Result<SessionBuilder, PlancalError> {
    let session_builder = Session::builder()
        .context(OrtInitSnafu { stage: "builder" })?
        .with_execution_providers(vec![
            #[cfg(all(feature = "coreml", target_os = "macos"))]
            {
                use ort::execution_providers::CoreMLExecutionProvider;
                use ort::execution_providers::coreml::*;
                CoreMLExecutionProvider::default()
                    .with_model_format(CoreMLModelFormat::MLProgram)
                    .build()
            },
            #[cfg(feature = "cuda")]
            {
                use ort::execution_providers::CUDAExecutionProvider;
                CUDAExecutionProvider::default().build()
            },
            CPUExecutionProvider::default().build(),
        ])
        .context(OrtInitSnafu { stage: "provider" })?
        .with_optimization_level(GraphOptimizationLevel::Level1)
        .context(OrtInitSnafu {
            stage: "optimization",
        })?
        .with_intra_threads(4)
        .context(OrtInitSnafu {
            stage: "intra-threads",
        })?;

    Ok(session_builder)
}
