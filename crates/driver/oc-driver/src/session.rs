//! Compilation sessions and the outputs they produce

use crate::config::{Config, Emit};
use anyhow::{Context, Result};
use oc_intern::Interner;
use oc_oil::OilWriter;
use oc_resolve::Diagnostics;
use oc_span::FileId;
use oc_syntax::{Node, TreeBuilder, dump_tree, load_json};
use oc_typeck::TypeChecker;
use std::path::{Path, PathBuf};

/// Everything one compilation produced
#[derive(Debug, Clone)]
pub struct Outputs {
    /// Annotated tree dump
    pub ast: String,
    /// Symbol table dump
    pub symbols: String,
    /// Generated code; absent when the semantic pass reported errors
    pub oil: Option<String>,
    /// Problems found, in reporting order
    pub diagnostics: Diagnostics,
}

impl Outputs {
    /// Whether code was generated
    pub fn succeeded(&self) -> bool {
        self.oil.is_some()
    }

    /// Text for one output kind, if it was produced
    pub fn get(&self, emit: Emit) -> Option<&str> {
        match emit {
            Emit::Ast => Some(&self.ast),
            Emit::Sym => Some(&self.symbols),
            Emit::Oil => self.oil.as_deref(),
        }
    }

    /// Write the requested outputs to `<dir>/<stem>.<ext>`, returning the paths written
    pub fn write_to(&self, dir: &Path, stem: &str, emit: &[Emit]) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let mut written = Vec::new();
        for &kind in emit {
            let Some(text) = self.get(kind) else {
                continue;
            };
            let path = dir.join(format!("{stem}.{}", kind.extension()));
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote output");
            written.push(path);
        }
        Ok(written)
    }
}

/// Compilation context: the interner shared by every tree and the active configuration
///
/// Each call to [`Session::compile`] creates fresh per-run state, so repeated
/// compilations in one session are independent.
#[derive(Debug, Clone, Default)]
pub struct Session {
    interner: Interner,
    config: Config,
}

impl Session {
    /// Create a session with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            interner: Interner::new(),
            config,
        }
    }

    /// Interner holding every identifier seen so far
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builder for constructing a tree in `file` by hand
    pub fn builder(&self, file: FileId) -> TreeBuilder<'_> {
        TreeBuilder::new(&self.interner, file)
    }

    /// Load a tree from its JSON form
    pub fn load_tree(&self, json: &str) -> Result<Node> {
        let root = load_json(json, &self.interner).context("Failed to load tree")?;
        Ok(root)
    }

    /// Run the semantic pass and, if it found no errors, the code generator
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn compile(&self, root: &mut Node) -> Outputs {
        let mut analysis = TypeChecker::run(root, &self.interner);
        if self.config.warnings_as_errors {
            analysis.diagnostics.promote_warnings();
        }

        let ast = dump_tree(root, &self.interner);
        let symbols = analysis.dump_symbols(&self.interner);
        let oil = if analysis.diagnostics.has_errors() {
            tracing::debug!(
                errors = analysis.diagnostics.errors().count(),
                "skipping code generation"
            );
            None
        } else {
            Some(OilWriter::generate(root, &analysis, &self.interner))
        };

        Outputs {
            ast,
            symbols,
            oil,
            diagnostics: std::mem::take(&mut analysis.diagnostics),
        }
    }

    /// Read a JSON tree from `path` and compile it
    pub fn compile_file(&self, path: &Path) -> Result<Outputs> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut root = self
            .load_tree(&source)
            .with_context(|| format!("In {}", path.display()))?;
        Ok(self.compile(&mut root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_syntax::NodeKind;
    use pretty_assertions::assert_eq;

    fn counting_loop(session: &Session) -> Node {
        let b = session.builder(FileId(0));
        b.root(
            "loop.oc",
            vec![
                b.vardecl((1, 4), b.decl("int", (1, 0), (1, 4), "i"), Some(b.int((1, 8), 0))),
                b.while_loop(
                    (2, 0),
                    b.binary(NodeKind::Lt, (2, 9), b.ident((2, 7), "i"), b.int((2, 11), 5)),
                    b.block(
                        (2, 14),
                        vec![b.assign(
                            (3, 6),
                            b.ident((3, 4), "i"),
                            b.binary(NodeKind::Add, (3, 10), b.ident((3, 8), "i"), b.int((3, 12), 1)),
                        )],
                    ),
                ),
            ],
        )
    }

    fn redeclaration(session: &Session) -> Node {
        let b = session.builder(FileId(0));
        b.root(
            "twice.oc",
            vec![
                b.vardecl((1, 4), b.decl("int", (1, 0), (1, 4), "x"), None),
                b.vardecl((2, 4), b.decl("int", (2, 0), (2, 4), "x"), None),
            ],
        )
    }

    #[test]
    fn test_compile_produces_every_output() {
        let session = Session::default();
        let outputs = session.compile(&mut counting_loop(&session));

        assert!(outputs.succeeded());
        assert!(outputs.diagnostics.is_empty());
        assert!(outputs.ast.starts_with("ROOT \"loop.oc\""));
        assert!(outputs.symbols.starts_with("i (0.1.4) {0} int variable lval"));
        assert!(outputs.oil.as_deref().is_some_and(|oil| oil.contains("while_0_2_0:;")));
    }

    #[test]
    fn test_errors_suppress_oil() {
        let session = Session::default();
        let b = session.builder(FileId(0));
        let mut root = b.root("bad.oc", vec![b.call((1, 3), (1, 0), "foo", vec![])]);

        let outputs = session.compile(&mut root);
        assert!(!outputs.succeeded());
        assert_eq!(
            outputs.diagnostics.render(),
            "0.1.0: error: identifier not found: 'foo'\n"
        );
        assert_eq!(outputs.get(Emit::Oil), None);
        assert!(outputs.get(Emit::Ast).is_some());
    }

    #[test]
    fn test_warnings_do_not_stop_generation() {
        let session = Session::default();
        let outputs = session.compile(&mut redeclaration(&session));

        assert!(outputs.succeeded());
        assert_eq!(outputs.diagnostics.warnings().count(), 1);
        let oil = outputs.oil.unwrap();
        assert_eq!(oil.matches("int _0_x;").count(), 1, "{oil}");
    }

    #[test]
    fn test_warnings_as_errors() {
        let session = Session::new(Config {
            warnings_as_errors: true,
            ..Config::default()
        });
        let outputs = session.compile(&mut redeclaration(&session));

        assert!(!outputs.succeeded());
        assert_eq!(outputs.diagnostics.errors().count(), 1);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let session = Session::default();
        let first = session.compile(&mut counting_loop(&session));
        let second = session.compile(&mut counting_loop(&session));

        assert_eq!(first.ast, second.ast);
        assert_eq!(first.symbols, second.symbols);
        assert_eq!(first.oil, second.oil);
    }

    #[test]
    fn test_write_to_respects_emit() {
        let session = Session::default();
        let outputs = session.compile(&mut counting_loop(&session));
        let dir = tempfile::tempdir().unwrap();

        let written = outputs
            .write_to(dir.path(), "loop", &[Emit::Sym, Emit::Oil])
            .unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("loop.sym"), dir.path().join("loop.oil")]
        );
        assert!(!dir.path().join("loop.ast").exists());
        let oil = std::fs::read_to_string(dir.path().join("loop.oil")).unwrap();
        assert_eq!(Some(oil.as_str()), outputs.oil.as_deref());
    }

    #[test]
    fn test_compile_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{"kind": "root", "text": "empty.oc"}"#).unwrap();

        let outputs = Session::default().compile_file(&path).unwrap();
        assert_eq!(outputs.oil.as_deref(), Some("void __ocmain (void)\n{\n}\n"));

        std::fs::write(&path, "{").unwrap();
        assert!(Session::default().compile_file(&path).is_err());
    }
}
