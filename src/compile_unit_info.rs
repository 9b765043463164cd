use std::path::PathBuf;

/// This struct holds the information needed to check this compilation unit,
/// like which intermediate results to print and where to put the emitted IR.
#[derive(Debug, Clone, Default)]
pub struct CompileUnitInfo {
    /// The source file of this compile unit.
    pub input: PathBuf,
    /// The file where to put the verified IR, if any.
    pub output_file: Option<PathBuf>,
    /// Whether to print the parsed AST.
    pub emit_ast: bool,
    /// Whether to print the lowered IR.
    pub emit_ir: bool,
}

impl CompileUnitInfo {
    /// The extension used for emitted IR files.
    pub const IR_EXTENSION: &'static str = "cir";

    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }
}
