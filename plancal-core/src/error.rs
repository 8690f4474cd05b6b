use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PlancalError {
    #[snafu(display("Ort Session init stage `{}` error: {}", stage, source))]
    OrtInit {
        source: ort::error::Error,
        stage: String,
    },
    #[snafu(display("Build Tensor for `{}` error: {}", stage, source))]
    Tensor {
        source: ort::error::Error,
        stage: String,
    },
    #[snafu(display("Onnx Inference error: {}", source))]
    Inference { source: ort::error::Error },
    #[snafu(display("Onnx Output can not found {}", output_name))]
    NotFoundOutput { output_name: String },
    #[snafu(display("Ndarray Shape error at stage `{}`: {}", stage, source))]
    Shape {
        source: ndarray::ShapeError,
        stage: String,
    },
    #[snafu(display("Read `{}` error: {}", path, source))]
    IoRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Write `{}` error: {}", path, source))]
    IoWrite {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Xlsx `{}` error: {}", path, source))]
    Xlsx {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Environment `{}` Not Found, error {}", name, source))]
    EnvNotFound {
        source: std::env::VarError,
        name: String,
    },
    #[snafu(display("Pdfium `{}` error {}", stage, source))]
    Pdfium {
        source: pdfium_render::prelude::PdfiumError,
        stage: String,
    },
    #[snafu(display("Fragment page number must start at 1, got {}", page))]
    InvalidFragment { page: usize },
    #[snafu(display("Invalid configuration: {}", message))]
    Config { message: String },
}
