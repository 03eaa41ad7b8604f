use std::io::{Error, ErrorKind, Read, Result, Write};

use log::debug;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;

fn main() {
    env_logger::init();
    if let Err(e) = faillible_main() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn faillible_main() -> Result<()> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;

    let req = CodeGeneratorRequest::decode(buf.as_slice()).map_err(|error| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("invalid CodeGeneratorRequest: {}", error),
        )
    })?;
    debug!(
        "request: {} files to generate, parameter {:?}",
        req.file_to_generate.len(),
        req.parameter()
    );

    let res = prost_dbtypes_build::compile_request(req);

    buf.clear();
    res.encode(&mut buf).map_err(|error| {
        Error::new(
            ErrorKind::Other,
            format!("failed to encode CodeGeneratorResponse: {}", error),
        )
    })?;
    std::io::stdout().write_all(&buf)?;

    Ok(())
}
