//! Rust AST for generated bridge modules.
//!
//! Only the constructs bridge modules need:
//! - RsItem: impls, type aliases, functions, unit structs, constants
//! - RsStmt: let bindings, expression statements, tail expressions
//! - RsExpr: paths, literals, calls, casts, references, unsafe blocks

/// Expression
#[derive(Debug, Clone)]
pub enum RsExpr {
    /// Path or identifier: `self.m_nCount`, `map`
    Path(String),
    /// String literal
    Str(String),
    /// Integer literal
    Int(i64),
    /// Function call: `rt::Value::from(x)`
    Call { func: String, args: Vec<RsExpr> },
    /// Method call: `map.insert(k, v)`, `subscriber.bind::<T>(sdk)`
    MethodCall {
        receiver: Box<RsExpr>,
        method: String,
        turbofish: Option<String>,
        args: Vec<RsExpr>,
    },
    /// `expr as ty`
    Cast { expr: Box<RsExpr>, ty: String },
    /// `&expr`
    Ref(Box<RsExpr>),
    /// `unsafe { expr }`
    Unsafe(Box<RsExpr>),
    /// `&[a, b]`
    SliceRef(Vec<RsExpr>),
    /// Verbatim expression text (configured conversion templates)
    Raw(String),
}

impl RsExpr {
    /// Bare path or identifier.
    pub fn path(path: impl Into<String>) -> Self {
        RsExpr::Path(path.into())
    }

    /// Free function call.
    pub fn call(func: impl Into<String>, args: Vec<RsExpr>) -> Self {
        RsExpr::Call {
            func: func.into(),
            args,
        }
    }

    /// Method call on `self`, without turbofish.
    pub fn method(self, method: impl Into<String>, args: Vec<RsExpr>) -> Self {
        RsExpr::MethodCall {
            receiver: Box::new(self),
            method: method.into(),
            turbofish: None,
            args,
        }
    }

    /// `self as ty`
    pub fn cast(self, ty: impl Into<String>) -> Self {
        RsExpr::Cast {
            expr: Box::new(self),
            ty: ty.into(),
        }
    }
}

/// Statement in a function body
#[derive(Debug, Clone)]
pub enum RsStmt {
    /// `let [mut] name = init;`
    Let {
        /// Binding name
        name: String,
        /// Emit `mut`
        mutable: bool,
        /// Initializer
        init: RsExpr,
    },
    /// Expression followed by `;`
    Expr(RsExpr),
    /// Trailing expression, no `;`
    Tail(RsExpr),
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct RsParam {
    /// Parameter name, or the whole receiver (`&self`)
    pub name: String,
    /// Type; empty for a receiver
    pub ty: String,
}

impl RsParam {
    /// Named, typed parameter.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// `&self`
    pub fn receiver() -> Self {
        Self::new("&self", "")
    }
}

/// Free function or method
#[derive(Debug, Clone)]
pub struct RsFunction {
    /// Doc comment, one line per `///`
    pub doc: Option<String>,
    /// Outer attributes, without `#[...]`
    pub attrs: Vec<String>,
    pub is_pub: bool,
    pub name: String,
    /// Generic parameters with bounds, e.g. `R: rt::Register`
    pub generics: Vec<String>,
    pub params: Vec<RsParam>,
    pub return_type: Option<String>,
    pub body: Vec<RsStmt>,
}

/// Associated constant inside an impl
#[derive(Debug, Clone)]
pub struct RsAssocConst {
    pub name: String,
    pub ty: String,
    pub value: RsExpr,
}

/// `impl Trait for Type { ... }`
#[derive(Debug, Clone)]
pub struct RsImpl {
    /// Implemented trait, e.g. `rt::CallbackRecord`
    pub trait_path: String,
    /// Implementing type, e.g. `native::LobbyCreated_t`
    pub self_ty: String,
    /// Associated constants, emitted before the methods
    pub consts: Vec<RsAssocConst>,
    pub methods: Vec<RsFunction>,
}

/// Top-level item
#[derive(Debug, Clone)]
pub enum RsItem {
    /// Trait impl
    Impl(RsImpl),
    /// `pub type Name = Target;`
    TypeAlias {
        /// Doc comment
        doc: Option<String>,
        /// Alias name
        name: String,
        /// Aliased type
        target: String,
    },
    /// Free function
    Function(RsFunction),
    /// `pub struct Name;`
    UnitStruct {
        /// Doc comment
        doc: Option<String>,
        /// Derived traits
        derives: Vec<String>,
        /// Struct name
        name: String,
    },
    /// `pub const NAME: Ty = value;`
    Const {
        /// Doc comment
        doc: Option<String>,
        /// Constant name
        name: String,
        /// Constant type
        ty: String,
        /// Initializer
        value: RsExpr,
    },
    /// Section separator comment
    Comment(String),
}

/// `use path as alias;`
#[derive(Debug, Clone)]
pub struct RsUse {
    /// Imported path
    pub path: String,
    /// `as` alias
    pub alias: Option<String>,
}

/// Complete generated module
#[derive(Debug, Clone)]
pub struct RsModule {
    /// Leading `//` comment lines
    pub banner: Vec<String>,
    /// Inner doc comment
    pub doc: Option<String>,
    /// Inner attributes, without `#![...]`
    pub inner_attrs: Vec<String>,
    /// Imports, in order
    pub uses: Vec<RsUse>,
    /// Items, each preceded by a blank line
    pub items: Vec<RsItem>,
}
