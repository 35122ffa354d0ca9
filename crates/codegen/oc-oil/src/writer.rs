//! File layout of the generated oil

use crate::mangle::{MangleKind, label, mangle};
use crate::temps::TempCounter;
use crate::types::{declarator_type, struct_tag};
use oc_intern::{Interner, Name};
use oc_syntax::{BlockNr, Node, NodeKind};
use oc_typeck::Analysis;

/// Statement indentation inside function bodies
pub(crate) const INDENT: &str = "        ";

/// Turns an attributed tree into oil text, one run per tree
pub struct OilWriter<'a> {
    pub(crate) interner: &'a Interner,
    pub(crate) analysis: &'a Analysis,
    pub(crate) temps: TempCounter,
    pub(crate) out: String,
}

impl<'a> OilWriter<'a> {
    /// Writer with an empty output and the temporary counter at 1
    pub fn new(analysis: &'a Analysis, interner: &'a Interner) -> Self {
        Self {
            interner,
            analysis,
            temps: TempCounter::new(),
            out: String::new(),
        }
    }

    /// Generate oil for `root` with a fresh writer
    pub fn generate(root: &Node, analysis: &'a Analysis, interner: &'a Interner) -> String {
        Self::new(analysis, interner).write(root)
    }

    /// Emit every section in order and return the text
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn write(mut self, root: &Node) -> String {
        self.write_structs(root);
        self.write_strings(root);
        self.write_globals(root);
        self.write_functions(root);
        self.write_main(root);
        tracing::debug!(bytes = self.out.len(), "oil written");
        self.out
    }

    fn write_structs(&mut self, root: &Node) {
        for item in root.children.iter().filter(|n| n.kind == NodeKind::Struct) {
            let Some((name, fields)) = item.children.split_first() else {
                continue;
            };
            // Only the last declaration of a struct name is laid out
            let analysis = self.analysis;
            let Some(id) = name.symbol.filter(|&id| analysis.structs.get(&name.text) == Some(&id)) else {
                continue;
            };
            let Some(table) = &analysis.symbol(id).fields else {
                continue;
            };
            let owner = self.text(name);
            self.out.push_str(&format!("struct {} {{\n", struct_tag(owner)));
            // Same order as the field table dump; a redeclared field keeps its slot
            for &field_id in table.values().rev() {
                let Some((field, field_name)) = fields.iter().find_map(|field| {
                    let field_name = field.declared_name()?;
                    (field_name.symbol == Some(field_id)).then_some((field, field_name))
                }) else {
                    continue;
                };
                let mangled = mangle(
                    MangleKind::Field { owner },
                    BlockNr::GLOBAL,
                    self.text(field_name),
                    field_name.loc,
                );
                let ty = declarator_type(field, self.interner);
                self.line(&format!("{ty} {mangled};"));
            }
            self.out.push_str("};\n");
        }
    }

    fn write_strings(&mut self, root: &Node) {
        for node in root.descendants() {
            match (node.kind, node.children.as_slice()) {
                (NodeKind::VarDecl, [decl, init]) if init.kind == NodeKind::StringCon => {
                    if let Some(name) = decl.declared_name() {
                        let binding = if self.replaces_variable(name) {
                            string_binding(node)
                        } else {
                            self.variable_name(name)
                        };
                        let literal = self.text(init);
                        self.out.push_str(&format!("char* {binding} = {literal};\n"));
                    }
                }
                (NodeKind::Assign, [_, value]) if value.kind == NodeKind::StringCon => {
                    let binding = string_binding(node);
                    let literal = self.text(value);
                    self.out.push_str(&format!("char* {binding} = {literal};\n"));
                }
                _ => {}
            }
        }
    }

    fn write_globals(&mut self, root: &Node) {
        for item in root.children.iter().filter(|n| n.kind == NodeKind::VarDecl) {
            let Some((decl, init)) = item.children.split_first() else {
                continue;
            };
            if init.first().is_some_and(|value| value.kind == NodeKind::StringCon) {
                continue;
            }
            let Some(name) = decl.declared_name().filter(|name| !self.replaces_variable(name)) else {
                continue;
            };
            let ty = declarator_type(decl, self.interner);
            let name = self.variable_name(name);
            self.out.push_str(&format!("{ty} {name};\n"));
        }
    }

    fn write_functions(&mut self, root: &Node) {
        let functions: Vec<&Node> = root
            .children
            .iter()
            .filter(|n| n.kind == NodeKind::Function)
            .collect();
        for (index, item) in functions.iter().enumerate() {
            let [decl, params, body] = item.children.as_slice() else {
                continue;
            };
            let Some(name) = decl.declared_name() else {
                continue;
            };
            // A later definition of the same name replaces this one
            let redefined = functions[index + 1..]
                .iter()
                .any(|later| defined_name(later) == Some(name.text));
            if redefined {
                continue;
            }
            let ty = declarator_type(decl, self.interner);
            let function = mangle(MangleKind::Function, name.block, self.text(name), name.loc);
            if params.children.is_empty() {
                self.out.push_str(&format!("{ty} {function} (void)\n"));
            } else {
                let params: Vec<String> = params
                    .children
                    .iter()
                    .filter_map(|param| {
                        let name = param.declared_name()?;
                        let ty = declarator_type(param, self.interner);
                        Some(format!("{INDENT}{ty} {}", self.variable_name(name)))
                    })
                    .collect();
                self.out
                    .push_str(&format!("{ty} {function} (\n{})\n", params.join(",\n")));
            }
            self.out.push_str("{\n");
            for statement in &body.children {
                self.lower_stmt(statement, Placement::Local);
            }
            self.out.push_str("}\n");
        }
    }

    fn write_main(&mut self, root: &Node) {
        self.out.push_str("void __ocmain (void)\n{\n");
        for item in &root.children {
            if matches!(
                item.kind,
                NodeKind::Struct | NodeKind::Function | NodeKind::Prototype
            ) {
                continue;
            }
            self.lower_stmt(item, Placement::TopLevel);
        }
        self.out.push_str("}\n");
    }

    pub(crate) fn text(&self, node: &Node) -> &'a str {
        self.interner.resolve(&node.text)
    }

    /// Mangled name of a declared or referenced variable, spelled from its declaration's block
    pub(crate) fn variable_name(&self, node: &Node) -> String {
        match node.symbol {
            Some(id) => mangle(
                MangleKind::Declared,
                self.analysis.symbol(id).block,
                self.text(node),
                node.loc,
            ),
            None => mangle(MangleKind::Other, node.block, self.text(node), node.loc),
        }
    }

    /// Whether `name` declares a variable that took over an earlier one of the same block
    pub(crate) fn replaces_variable(&self, name: &Node) -> bool {
        name.symbol
            .is_some_and(|id| self.analysis.symbol(id).replaces.is_some())
    }

    /// One indented statement line
    pub(crate) fn line(&mut self, text: &str) {
        self.out.push_str(INDENT);
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// A label anchor at column 0
    pub(crate) fn anchor(&mut self, prefix: &str, node: &Node) {
        self.out
            .push_str(&mangle(MangleKind::Label, node.block, prefix, node.loc));
        self.out.push('\n');
    }
}

/// Where a statement sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// Directly in the file; declarations already exist as globals
    TopLevel,
    /// Inside a function or block
    Local,
}

/// File-scope name a string literal stored by `node` is bound to
pub(crate) fn string_binding(node: &Node) -> String {
    label("str", node.loc)
}

fn defined_name(function: &Node) -> Option<Name> {
    function
        .children
        .first()
        .and_then(Node::declared_name)
        .map(|name| name.text)
}
