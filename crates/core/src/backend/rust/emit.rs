//! Rust code emission via the Emit trait.
//!
//! Each AST type implements `Emit`; statements and items that nest take an
//! indentation level.

use super::types::{
    RsAssocConst, RsExpr, RsFunction, RsImpl, RsItem, RsModule, RsParam, RsStmt, RsUse,
};

const INDENT: &str = "    ";

/// Trait for emitting Rust code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its Rust source text.
    fn emit(&self) -> String;
}

fn join(exprs: &[RsExpr]) -> String {
    exprs.iter().map(Emit::emit).collect::<Vec<_>>().join(", ")
}

fn quote(s: &str) -> String {
    format!("{s:?}")
}

fn emit_doc(doc: Option<&String>, prefix: &str) -> String {
    doc.map(|doc| {
        doc.lines()
            .map(|line| {
                if line.is_empty() {
                    format!("{prefix}///\n")
                } else {
                    format!("{prefix}/// {line}\n")
                }
            })
            .collect()
    })
    .unwrap_or_default()
}

// =============================================================================
// Expressions and statements
// =============================================================================

impl Emit for RsExpr {
    fn emit(&self) -> String {
        match self {
            RsExpr::Path(path) => path.clone(),
            RsExpr::Str(s) => quote(s),
            RsExpr::Int(i) => i.to_string(),
            RsExpr::Call { func, args } => format!("{func}({})", join(args)),
            RsExpr::MethodCall {
                receiver,
                method,
                turbofish,
                args,
            } => {
                let turbofish = turbofish
                    .as_ref()
                    .map(|ty| format!("::<{ty}>"))
                    .unwrap_or_default();
                format!("{}.{method}{turbofish}({})", receiver.emit(), join(args))
            }
            RsExpr::Cast { expr, ty } => match **expr {
                RsExpr::Path(_) => format!("{} as {ty}", expr.emit()),
                _ => format!("({}) as {ty}", expr.emit()),
            },
            RsExpr::Ref(inner) => format!("&{}", inner.emit()),
            RsExpr::Unsafe(inner) => format!("unsafe {{ {} }}", inner.emit()),
            RsExpr::SliceRef(items) => format!("&[{}]", join(items)),
            RsExpr::Raw(code) => code.clone(),
        }
    }
}

impl RsStmt {
    fn emit_indented(&self, indent: usize) -> String {
        let prefix = INDENT.repeat(indent);
        match self {
            RsStmt::Let {
                name,
                mutable,
                init,
            } => {
                let mutability = if *mutable { "mut " } else { "" };
                format!("{prefix}let {mutability}{name} = {};\n", init.emit())
            }
            RsStmt::Expr(expr) => format!("{prefix}{};\n", expr.emit()),
            RsStmt::Tail(expr) => format!("{prefix}{}\n", expr.emit()),
        }
    }
}

// =============================================================================
// Functions and impls
// =============================================================================

impl Emit for RsParam {
    fn emit(&self) -> String {
        if self.ty.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.ty)
        }
    }
}

impl RsFunction {
    fn emit_indented(&self, indent: usize) -> String {
        let prefix = INDENT.repeat(indent);
        let mut output = emit_doc(self.doc.as_ref(), &prefix);

        for attr in &self.attrs {
            output.push_str(&format!("{prefix}#[{attr}]\n"));
        }

        let visibility = if self.is_pub { "pub " } else { "" };
        let generics = if self.generics.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.generics.join(", "))
        };
        let return_type = self
            .return_type
            .as_ref()
            .map(|ty| format!(" -> {ty}"))
            .unwrap_or_default();

        let params: Vec<String> = self.params.iter().map(Emit::emit).collect();
        let one_line = format!(
            "{prefix}{visibility}fn {}{generics}({}){return_type} {{\n",
            self.name,
            params.join(", ")
        );
        // Wrap long signatures one parameter per line, the way rustfmt does
        if one_line.len() > 100 {
            output.push_str(&format!("{prefix}{visibility}fn {}{generics}(\n", self.name));
            for param in &params {
                output.push_str(&format!("{prefix}{INDENT}{param},\n"));
            }
            output.push_str(&format!("{prefix}){return_type} {{\n"));
        } else {
            output.push_str(&one_line);
        }

        for stmt in &self.body {
            output.push_str(&stmt.emit_indented(indent + 1));
        }
        output.push_str(&format!("{prefix}}}\n"));
        output
    }
}

impl Emit for RsFunction {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl Emit for RsAssocConst {
    fn emit(&self) -> String {
        format!("{INDENT}const {}: {} = {};\n", self.name, self.ty, self.value.emit())
    }
}

impl Emit for RsImpl {
    fn emit(&self) -> String {
        let mut output = format!("impl {} for {} {{\n", self.trait_path, self.self_ty);
        for constant in &self.consts {
            output.push_str(&constant.emit());
        }
        for (i, method) in self.methods.iter().enumerate() {
            if i > 0 || !self.consts.is_empty() {
                output.push('\n');
            }
            output.push_str(&method.emit_indented(1));
        }
        output.push_str("}\n");
        output
    }
}

// =============================================================================
// Items and module
// =============================================================================

impl Emit for RsItem {
    fn emit(&self) -> String {
        match self {
            RsItem::Impl(imp) => imp.emit(),
            RsItem::TypeAlias { doc, name, target } => {
                format!("{}pub type {name} = {target};\n", emit_doc(doc.as_ref(), ""))
            }
            RsItem::Function(func) => func.emit(),
            RsItem::UnitStruct { doc, derives, name } => {
                let mut output = emit_doc(doc.as_ref(), "");
                if !derives.is_empty() {
                    output.push_str(&format!("#[derive({})]\n", derives.join(", ")));
                }
                output.push_str(&format!("pub struct {name};\n"));
                output
            }
            RsItem::Const {
                doc,
                name,
                ty,
                value,
            } => format!(
                "{}pub const {name}: {ty} = {};\n",
                emit_doc(doc.as_ref(), ""),
                value.emit()
            ),
            RsItem::Comment(text) => {
                let rule = "=".repeat(77);
                format!("// {rule}\n// {text}\n// {rule}\n")
            }
        }
    }
}

impl Emit for RsUse {
    fn emit(&self) -> String {
        match &self.alias {
            Some(alias) => format!("use {} as {alias};\n", self.path),
            None => format!("use {};\n", self.path),
        }
    }
}

impl Emit for RsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        for line in &self.banner {
            output.push_str(&format!("// {line}\n"));
        }
        if !self.banner.is_empty() {
            output.push('\n');
        }

        if let Some(doc) = &self.doc {
            for line in doc.lines() {
                if line.is_empty() {
                    output.push_str("//!\n");
                } else {
                    output.push_str(&format!("//! {line}\n"));
                }
            }
            output.push('\n');
        }

        for attr in &self.inner_attrs {
            output.push_str(&format!("#![{attr}]\n"));
        }
        if !self.inner_attrs.is_empty() {
            output.push('\n');
        }

        for import in &self.uses {
            output.push_str(&import.emit());
        }

        for item in &self.items {
            output.push('\n');
            output.push_str(&item.emit());
        }

        output
    }
}
