use std::path::PathBuf;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions, CodegenReturn};
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;

pub mod ast_utils;
pub mod transforms;

pub struct Protoclass {
    max_iterations: usize,
    parse_options: ParseOptions,
    codegen_options: CodegenOptions,
    transforms: Vec<Box<dyn Transform>>,
}

impl Default for Protoclass {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            parse_options: ParseOptions { parse_regular_expression: true, ..ParseOptions::default() },
            codegen_options: CodegenOptions::default(),
            transforms: vec![Box::new(transforms::convert_to_class::ConvertToClass)],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    pub max_iterations: Option<usize>,
    pub source_type: Option<SourceType>,
    pub filename_for_source_type: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Error {
    InvalidSourceType { path: PathBuf, message: String },
    ParseFailed,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidSourceType { path, message } => {
                write!(f, "Failed to determine source type for {}: {}", path.display(), message)
            }
            Error::ParseFailed => write!(f, "Parsing failed"),
        }
    }
}

impl std::error::Error for Error {}

pub struct ConvertResult {
    pub modified: bool,
    pub code: String,
}

pub trait Transform {
    fn name(&self) -> &'static str;

    fn run<'a>(&self, ctx: &mut TransformCtx<'a>, program: &mut oxc_ast::ast::Program<'a>) -> bool;
}

pub struct TransformCtx<'a> {
    pub allocator: &'a Allocator,
    pub source_text: &'a str,
    pub source_type: SourceType,
}

impl Protoclass {
    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.max_iterations = max_iterations;
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn convert(&self, source_text: &str, opts: ConvertOptions) -> Result<ConvertResult, Error> {
        let allocator = Allocator::default();

        let source_type = if let Some(st) = opts.source_type {
            st
        } else if let Some(path) = opts.filename_for_source_type.as_ref() {
            SourceType::from_path(path)
                .map_err(|e| Error::InvalidSourceType { path: path.clone(), message: e.to_string() })?
        } else {
            SourceType::mjs()
        };

        let max_iterations = opts.max_iterations.unwrap_or(self.max_iterations);

        let parse_ret = Parser::new(&allocator, source_text, source_type)
            .with_options(self.parse_options)
            .parse();

        if !parse_ret.errors.is_empty() {
            return Err(Error::ParseFailed);
        }

        let mut program = parse_ret.program;
        let mut modified_any = false;

        // Converting a candidate can expose another one (e.g. inside a method
        // body that only becomes a class member this pass), so iterate until a
        // full pass leaves the tree unchanged.
        for _ in 0..max_iterations {
            let mut modified_iter = false;
            let mut ctx = TransformCtx { allocator: &allocator, source_text, source_type };
            for t in &self.transforms {
                if t.run(&mut ctx, &mut program) {
                    modified_iter = true;
                }
            }
            if modified_iter {
                modified_any = true;
            } else {
                break;
            }
        }

        let CodegenReturn { code, .. } = Codegen::new()
            .with_options(self.codegen_options.clone())
            .with_source_text(source_text)
            .build(&program);

        Ok(ConvertResult { modified: modified_any, code })
    }
}
