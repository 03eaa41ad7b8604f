//! protoc plugin support.

use log::{debug, error};
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::FileDescriptorProto;

use crate::Config;

/// Runs the generator on a protoc plugin request.
///
/// The request's `parameter` is parsed with [`Config::from_parameter`]. Only the files listed
/// in `file_to_generate` produce output; they are visited in the order protoc lists them in
/// `proto_file`, which is dependency order. Failures are reported through the response's
/// `error` field, as the plugin protocol requires.
pub fn compile_request(request: CodeGeneratorRequest) -> CodeGeneratorResponse {
    let mut response = CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    };

    let config = match Config::from_parameter(request.parameter()) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            response.error = Some(err.to_string());
            return response;
        }
    };

    let files: Vec<FileDescriptorProto> = request
        .proto_file
        .into_iter()
        .filter(|file| request.file_to_generate.iter().any(|name| name == file.name()))
        .collect();
    debug!("generating for {} of {} files", files.len(), request.file_to_generate.len());

    match config.generate(&files) {
        Ok(generated) => {
            response.file = generated
                .into_iter()
                .map(|file| File {
                    name: Some(file.name),
                    content: Some(file.content),
                    ..Default::default()
                })
                .collect();
        }
        Err(err) => {
            error!("{err}");
            response.error = Some(err.to_string());
        }
    }

    response
}
