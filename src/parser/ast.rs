// AST definitions for the C header parser

/// Source location information for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Built-in C primitive kinds as they appear in header declarations.
///
/// `unsigned`, `signed`, `long` and `short` spellings are folded into a
/// single kind during type parsing, so `unsigned long long int` and
/// `unsigned long long` produce the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    SignedChar,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    LongDouble,
}

/// Type representation at declaration granularity.
///
/// Unlike a full C type system this keeps only what binding emission needs:
/// pointers remember the const-ness of their pointee, arrays keep their
/// constant size, and everything named (typedefs, records, enums) is a
/// `Named` spelling resolved later by the name translator.
#[derive(Debug, Clone, PartialEq)]
pub enum CType {
    Primitive(PrimitiveKind),
    Named(String),
    Pointer { pointee: Box<CType>, is_const: bool },
    Array { element: Box<CType>, size: usize },
    FunctionPointer(Box<FunctionSig>),
}

impl CType {
    pub fn pointer_to(pointee: CType, is_const: bool) -> Self {
        CType::Pointer {
            pointee: Box::new(pointee),
            is_const,
        }
    }

    pub fn array_of(element: CType, size: usize) -> Self {
        CType::Array {
            element: Box::new(element),
            size,
        }
    }

    /// True for `char*` / `const char*` (the string-marshaling cases).
    pub fn is_char_pointer(&self) -> bool {
        matches!(
            self,
            CType::Pointer { pointee, .. }
                if **pointee == CType::Primitive(PrimitiveKind::Char)
        )
    }

    /// True for `const char*` specifically.
    pub fn is_const_char_pointer(&self) -> bool {
        matches!(
            self,
            CType::Pointer { pointee, is_const: true }
                if **pointee == CType::Primitive(PrimitiveKind::Char)
        )
    }
}

/// Function signature shared by function declarations, function-pointer
/// typedefs, and function-pointer struct fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub return_type: CType,
    pub params: Vec<Param>,
    pub variadic: bool,
}

/// Function or function-pointer parameter. Headers may omit the name.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: CType,
}

/// Unary operators allowed in enum constant expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    BitNot,
}

/// Binary operators allowed in enum constant expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    BitOr,
    BitAnd,
    BitXor,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::BitOr => "|",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
        }
    }
}

/// Constant expression tree for enumerator values.
///
/// Literals keep their raw source spelling so hex values round-trip as hex.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstExpr {
    IntLiteral { value: i64, raw: String },
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<ConstExpr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<ConstExpr>,
        rhs: Box<ConstExpr>,
    },
    Paren(Box<ConstExpr>),
}

/// Single enumerator within an enum definition
#[derive(Debug, Clone)]
pub struct EnumItem {
    pub name: String,
    /// Explicit value expression, if the header spelled one out.
    pub expr: Option<ConstExpr>,
    /// Value computed during parsing (explicit or auto-incremented), when
    /// every referenced name could be resolved.
    pub computed: Option<i64>,
    pub location: SourceLocation,
}

/// Enum definition (always reaches us through `typedef enum`)
#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: String,
    pub items: Vec<EnumItem>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Struct,
    Union,
}

/// Struct or union field body.
///
/// `Record` fields hold a nested (usually anonymous) struct/union definition
/// inline, as C unions commonly do; the emitter lifts those into their own
/// named types.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Plain(CType),
    Record(RecordDecl),
    FunctionPointer(FunctionSig),
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub kind: FieldKind,
    /// Bit width for bitfield members, carried for layout fidelity.
    pub bits: Option<u32>,
    pub location: SourceLocation,
}

/// Struct or union definition with at least one field
#[derive(Debug, Clone)]
pub struct RecordDecl {
    pub name: String,
    pub kind: RecordKind,
    pub fields: Vec<FieldDecl>,
    pub is_anonymous: bool,
    pub location: SourceLocation,
}

/// Body of a `typedef` declaration
#[derive(Debug, Clone)]
pub enum TypedefBody {
    /// `typedef Uint32 SDL_WindowID;`
    Alias(CType),
    /// `typedef struct SDL_Window SDL_Window;` with no definition in scope
    OpaqueRecord,
    /// `typedef void (SDLCALL *SDL_EventFilter)(void *userdata, SDL_Event *event);`
    FunctionPointer(FunctionSig),
}

#[derive(Debug, Clone)]
pub struct TypedefDecl {
    pub name: String,
    pub body: TypedefBody,
    pub location: SourceLocation,
}

/// Exported function declaration
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub sig: FunctionSig,
    pub location: SourceLocation,
}

/// Object-like or function-like `#define`
#[derive(Debug, Clone)]
pub struct MacroDecl {
    pub name: String,
    /// `Some` for function-like macros; those are never emitted as constants.
    pub params: Option<Vec<String>>,
    /// Raw replacement text with comments stripped and whitespace collapsed.
    pub value: String,
    pub location: SourceLocation,
}

/// Top-level declaration kinds collected from one header
#[derive(Debug, Clone)]
pub enum Declaration {
    Enum(EnumDecl),
    Record(RecordDecl),
    Typedef(TypedefDecl),
    Function(FunctionDecl),
    Macro(MacroDecl),
}

impl Declaration {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Declaration::Enum(decl) => &decl.location,
            Declaration::Record(decl) => &decl.location,
            Declaration::Typedef(decl) => &decl.location,
            Declaration::Function(decl) => &decl.location,
            Declaration::Macro(decl) => &decl.location,
        }
    }
}

/// All declarations parsed from a single header file, in source order
#[derive(Debug, Clone, Default)]
pub struct HeaderUnit {
    pub file: String,
    pub decls: Vec<Declaration>,
}

impl HeaderUnit {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            decls: Vec::new(),
        }
    }
}
