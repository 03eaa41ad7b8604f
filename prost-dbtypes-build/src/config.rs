use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;
use std::fs;
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, trace, warn};
use prost_types::{FileDescriptorProto, FileDescriptorSet};

use crate::code_generator::{name_collisions, CodeGenerator, EmittedPackages};
use crate::module::Module;
use crate::GeneratedFile;

/// Extension appended to the stem of each `.proto` file to name its generated unit.
const FILE_SUFFIX: &str = "dbtypes.rs";

/// Where generated files are placed, relative to the output directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PathLayout {
    /// Under the directory of the file's package: `test/v1/test.dbtypes.rs` for a file
    /// `protos/test.proto` declaring `package test.v1;`.
    #[default]
    Import,
    /// Next to the input file: `protos/test.dbtypes.rs`.
    SourceRelative,
}

impl FromStr for PathLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "import" => Ok(PathLayout::Import),
            "source_relative" => Ok(PathLayout::SourceRelative),
            other => Err(Error::new(
                ErrorKind::InvalidInput,
                format!("invalid paths option {other:?}: expected `import` or `source_relative`"),
            )),
        }
    }
}

impl fmt::Display for PathLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PathLayout::Import => "import",
            PathLayout::SourceRelative => "source_relative",
        })
    }
}

/// Configuration options for column wrapper generation.
///
/// This configuration builder can be used to set non-default code generation options.
/// Once built, it is never modified by the generator.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub(crate) excluded_types: HashSet<String>,
    pub(crate) only_package: Option<String>,
    pub(crate) path_layout: PathLayout,
    pub(crate) prost_path: Option<String>,
    pub(crate) dbtypes_path: Option<String>,
    pub(crate) out_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new code generator configuration with default options.
    pub fn new() -> Config {
        Config::default()
    }

    /// Parses the option string protoc passes to a plugin (`--prost-dbtypes_opt=...`).
    ///
    /// Options are separated by commas:
    ///
    /// - `exclude=<name>`: skip a message, given by short or full name. Bare entries
    ///   following an `exclude` continue its list, so `exclude=Foo,Bar` skips both.
    /// - `package=<name>`: only generate wrappers for messages of this protobuf package.
    /// - `paths=import|source_relative`: see [`PathLayout`].
    /// - `prost_path=<path>`, `dbtypes_path=<path>`: see [`Config::prost_path`] and
    ///   [`Config::dbtypes_path`].
    pub fn from_parameter(parameter: &str) -> Result<Config> {
        let mut config = Config::new();
        let mut in_exclude = false;

        for token in parameter.split(',') {
            let Some((key, value)) = token.split_once('=') else {
                if token.trim().is_empty() {
                    continue;
                }
                if in_exclude {
                    config.exclude([token]);
                    continue;
                }
                return Err(invalid_option(token));
            };

            in_exclude = false;
            match key.trim() {
                "exclude" => {
                    config.exclude([value]);
                    in_exclude = true;
                }
                "package" => {
                    config.only_package(value);
                }
                "paths" => {
                    config.path_layout(value.trim().parse()?);
                }
                "prost_path" => {
                    config.prost_path(value.trim());
                }
                "dbtypes_path" => {
                    config.dbtypes_path(value.trim());
                }
                _ => return Err(invalid_option(token)),
            }
        }

        trace!("parsed plugin options {parameter:?}: {config:?}");
        Ok(config)
    }

    /// Skips generation for the named messages.
    ///
    /// Each name is either a short message name (`Foo`), which matches every message with
    /// that name in any package and at any nesting depth, or a full name
    /// (`pkg.v1.Outer.Foo`, without a leading dot). Names are trimmed; empty names are
    /// ignored. Excluding a message does not exclude the messages nested inside it.
    ///
    /// # Example
    ///
    /// ```rust
    /// # let mut config = prost_dbtypes_build::Config::new();
    /// config.exclude(["InternalNote", "audit.v1.Envelope"]);
    /// ```
    pub fn exclude<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_types.extend(
            names
                .into_iter()
                .map(|name| name.as_ref().trim().to_owned())
                .filter(|name| !name.is_empty()),
        );
        self
    }

    /// Restricts generation to messages declared in `package` (e.g. `test.v1`).
    ///
    /// The name is trimmed; an empty name removes the restriction.
    pub fn only_package<S>(&mut self, package: S) -> &mut Self
    where
        S: AsRef<str>,
    {
        let package = package.as_ref().trim();
        self.only_package = (!package.is_empty()).then(|| package.to_owned());
        self
    }

    /// Configures where generated files are placed. Defaults to [`PathLayout::Import`].
    pub fn path_layout(&mut self, layout: PathLayout) -> &mut Self {
        self.path_layout = layout;
        self
    }

    /// Declares the path to the `prost` crate used by emitted code. Defaults to `::prost`.
    pub fn prost_path<S>(&mut self, path: S) -> &mut Self
    where
        S: Into<String>,
    {
        self.prost_path = Some(path.into());
        self
    }

    /// Declares the path to the `prost-dbtypes` runtime crate used by emitted code.
    /// Defaults to `::prost_dbtypes`.
    pub fn dbtypes_path<S>(&mut self, path: S) -> &mut Self
    where
        S: Into<String>,
    {
        self.dbtypes_path = Some(path.into());
        self
    }

    /// Configures the output directory used by [`Config::compile_fds`].
    ///
    /// If unset, defaults to the `OUT_DIR` environment variable. `OUT_DIR` is set by Cargo
    /// when executing build scripts, so `out_dir` typically does not need to be configured.
    pub fn out_dir<P>(&mut self, path: P) -> &mut Self
    where
        P: Into<PathBuf>,
    {
        self.out_dir = Some(path.into());
        self
    }

    pub(crate) fn resolve_prost_path(&self) -> &str {
        self.prost_path.as_deref().unwrap_or("::prost")
    }

    pub(crate) fn resolve_dbtypes_path(&self) -> &str {
        self.dbtypes_path.as_deref().unwrap_or("::prost_dbtypes")
    }

    /// Generates wrapper code for `files`, in order.
    ///
    /// Files should be supplied in dependency order, as protoc does. The shared
    /// `ProtoValue` of a package is emitted into the first file of that package with a
    /// selected message; files without a selected message produce no output.
    ///
    /// Each call is an independent run: the record of emitted packages does not carry over
    /// to the next call.
    ///
    /// Two files whose units would be written to the same path are an error.
    pub fn generate(&self, files: &[FileDescriptorProto]) -> Result<Vec<GeneratedFile>> {
        for collision in name_collisions(self, files) {
            warn!("{collision}");
        }

        let mut emitted = EmittedPackages::default();
        let mut sources: HashMap<String, &str> = HashMap::new();
        let mut generated = Vec::new();

        for file in files {
            if let Some(tokens) = CodeGenerator::generate(self, file, &mut emitted)? {
                let name = self.output_name(file);
                if let Some(previous) = sources.insert(name.clone(), file.name()) {
                    return Err(Error::new(
                        ErrorKind::InvalidInput,
                        format!(
                            "{:?} and {:?} would both generate {name:?}; use `paths=source_relative` \
                             or rename one of them",
                            previous,
                            file.name()
                        ),
                    ));
                }
                debug!("generated {} for {}", name, file.name());
                generated.push(GeneratedFile {
                    name,
                    content: crate::format_file(tokens)?,
                });
            }
        }

        Ok(generated)
    }

    /// Generates wrapper code for every file of `fds` and writes it below the output
    /// directory.
    ///
    /// Files whose content did not change are left untouched, so that Cargo does not rebuild
    /// needlessly. The first write failure aborts the run.
    pub fn compile_fds(&self, fds: FileDescriptorSet) -> Result<()> {
        let target = match &self.out_dir {
            Some(out_dir) => out_dir.clone(),
            None => env::var_os("OUT_DIR").map(PathBuf::from).ok_or_else(|| {
                Error::new(ErrorKind::Other, "OUT_DIR environment variable is not set")
            })?,
        };

        for file in self.generate(&fds.file)? {
            let path = target.join(&file.name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            write_file_if_changed(&path, file.content.as_bytes())?;
        }

        Ok(())
    }

    /// The name of the unit generated for `file`, relative to the output directory.
    pub(crate) fn output_name(&self, file: &FileDescriptorProto) -> String {
        let name = file.name();
        let without_ext = name.strip_suffix(".proto").unwrap_or(name);
        match self.path_layout {
            PathLayout::SourceRelative => format!("{without_ext}.{FILE_SUFFIX}"),
            PathLayout::Import => {
                let stem = without_ext.rsplit('/').next().unwrap_or(without_ext);
                let dir = Module::from_protobuf_package_name(file.package()).to_dir_name();
                if dir.is_empty() {
                    format!("{stem}.{FILE_SUFFIX}")
                } else {
                    format!("{dir}/{stem}.{FILE_SUFFIX}")
                }
            }
        }
    }
}

fn invalid_option(token: &str) -> Error {
    Error::new(
        ErrorKind::InvalidInput,
        format!("unknown plugin option {:?}", token.trim()),
    )
}

fn write_file_if_changed(path: &Path, content: &[u8]) -> Result<()> {
    let previous_content = fs::read(path);

    if previous_content
        .map(|previous_content| previous_content == content)
        .unwrap_or(false)
    {
        trace!("unchanged: {:?}", path);
        Ok(())
    } else {
        trace!("writing: {:?}", path);
        fs::write(path, content)
    }
}
