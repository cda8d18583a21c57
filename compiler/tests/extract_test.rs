use protodts_compiler::{build_protocol, extract, DtsError, Extraction, ProtocolConfig, WalkerOptions};
use protodts_syntax::{
    FileId, HeritageToken, NodeId, NodeKind, Program, ProgramBuilder, ResolvedType, Span, SymbolId,
    TypeFlags, TypeId,
};

#[derive(Clone, Copy)]
struct Decl {
    node:   NodeId,
    symbol: SymbolId,
    ty:     TypeId,
}

struct Fixture {
    b:        ProgramBuilder,
    protocol: FileId,
    services: FileId,
    lib:      FileId,
}

impl Fixture {
    fn new() -> Self {
        let mut b = ProgramBuilder::new();
        let protocol = b.file("protocol.d.ts");
        let services = b.file("built/local/typescriptServices.d.ts");
        let lib = b.file("built/local/lib.es5.d.ts");
        Fixture { b, protocol, services, lib }
    }

    fn declare(&mut self, file: FileId, kind: NodeKind, name: &str, text: &str) -> Decl {
        let root = self.b.root(file);
        let node = self.b.add_node(root, kind);
        let ident = self.b.add_node(node, NodeKind::Identifier);
        let span = self.b.push_text(file, text);
        self.b.set_span(node, span);
        if let Some(offset) = text.find(name) {
            let pos = span.pos + offset;
            self.b.set_span(ident, Span::new(pos, pos + name.len()));
        }
        let symbol = self.b.add_symbol(name);
        self.b.declare(symbol, node);
        let ty = self.b.add_type(ResolvedType { symbol: Some(symbol), ..Default::default() });
        Decl { node, symbol, ty }
    }

    fn interface(&mut self, file: FileId, name: &str, text: &str) -> Decl {
        self.declare(file, NodeKind::InterfaceDeclaration, name, text)
    }

    fn enumeration(&mut self, file: FileId, name: &str, text: &str, initializer: NodeKind) -> Decl {
        let decl = self.declare(file, NodeKind::EnumDeclaration, name, text);
        for _ in 0..2 {
            let member = self.b.add_node(decl.node, NodeKind::EnumMember { initializer: None });
            self.b.set_initializer(member, initializer.clone());
        }
        decl
    }

    /// `owner` gains a property signature annotated with `ty`.
    fn property(&mut self, owner: NodeId, ty: TypeId) -> NodeId {
        let prop = self.b.add_node(owner, NodeKind::PropertySignature { type_annotation: None });
        let annotation = self.b.annotate(prop, NodeKind::TypeReference);
        self.b.set_type(annotation, ty);
        prop
    }

    fn union_property(&mut self, owner: NodeId, arms: &[TypeId]) {
        let prop = self.b.add_node(owner, NodeKind::PropertySignature { type_annotation: None });
        let union = self.b.annotate(prop, NodeKind::UnionType);
        for &arm in arms {
            let reference = self.b.add_node(union, NodeKind::TypeReference);
            self.b.set_type(reference, arm);
        }
    }

    fn heritage(&mut self, interface: NodeId, token: HeritageToken, base: TypeId) {
        let clause = self.b.add_node(interface, NodeKind::HeritageClause { token });
        let expression = self.b.add_node(clause, NodeKind::ExpressionWithTypeArguments);
        self.b.set_type(expression, base);
    }

    fn instantiate(&mut self, generic: Decl, arguments: Vec<TypeId>) -> TypeId {
        self.b.add_type(ResolvedType {
            symbol:         Some(generic.symbol),
            type_arguments: arguments,
            ..Default::default()
        })
    }

    fn finish(self) -> (Program, FileId) {
        (self.b.finish(), self.protocol)
    }
}

fn run(program: &Program, root: FileId) -> Result<Extraction, DtsError> {
    extract(root, program, &WalkerOptions::default())
}

const ARGS: &str = "\n/** Arguments of a request. */\ninterface Args {\n    file: FileLocation;\n}\n";
const FILE_LOCATION: &str = "interface FileLocation {\n    line: number;\n}\n";

#[test]
fn test_inlines_transitive_dependencies_in_discovery_order() {
    let mut f = Fixture::new();
    let args = f.interface(f.services, "Args", ARGS);
    let location = f.interface(f.services, "FileLocation", FILE_LOCATION);
    let number = f.b.add_type(ResolvedType { flags: TypeFlags::PRIMITIVE, ..Default::default() });
    f.property(args.node, location.ty);
    f.property(location.node, number);

    let request = f.interface(f.protocol, "Request", "interface Request {\n    args: Args;\n}\n");
    f.property(request.node, args.ty);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.text, format!("{}\n{}\n", ARGS, FILE_LOCATION));
    assert!(result.stubbed.is_empty());
}

#[test]
fn test_types_declared_in_root_are_not_duplicated() {
    let mut f = Fixture::new();
    let response = f.interface(f.protocol, "Response", "interface Response {}\n");
    let request = f.interface(f.protocol, "Request", "interface Request {\n    response: Response;\n}\n");
    f.property(request.node, response.ty);

    let (program, root) = f.finish();
    assert_eq!(run(&program, root).unwrap(), Extraction::default());
}

#[test]
fn test_builtin_library_types_are_skipped() {
    let mut f = Fixture::new();
    let promise = f.interface(f.lib, "Promise", "interface Promise<T> {}\n");
    let request = f.interface(f.protocol, "Request", "interface Request {\n    done: Promise<void>;\n}\n");
    f.property(request.node, promise.ty);

    let (program, root) = f.finish();
    assert_eq!(run(&program, root).unwrap(), Extraction::default());
}

#[test]
fn test_mutually_recursive_declarations_emit_once() {
    let mut f = Fixture::new();
    let a = f.interface(f.services, "Node", "interface Node {\n    parent: Tree;\n}\n");
    let b = f.interface(f.services, "Tree", "interface Tree {\n    root: Node;\n}\n");
    f.property(a.node, b.ty);
    f.property(b.node, a.ty);

    let request = f.interface(f.protocol, "Request", "interface Request {\n    node: Node;\n    tree: Tree;\n}\n");
    f.property(request.node, a.ty);
    f.property(request.node, b.ty);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(
        result.text,
        "interface Node {\n    parent: Tree;\n}\n\ninterface Tree {\n    root: Node;\n}\n\n"
    );
}

#[test]
fn test_array_wrappers_are_unwrapped() {
    let mut f = Fixture::new();
    // Declared outside the builtin library on purpose: the wrapper is
    // skipped because of its name, not its file.
    let array = f.interface(f.services, "Array", "interface Array<T> {}\n");
    let readonly = f.interface(f.services, "ReadonlyArray", "interface ReadonlyArray<T> {}\n");
    let item = f.interface(f.services, "Item", "interface Item {}\n");
    let items = f.instantiate(array, vec![item.ty]);
    let nested = f.instantiate(readonly, vec![items]);

    let request = f.interface(f.protocol, "Request", "interface Request {\n    items: readonly Item[][];\n}\n");
    f.property(request.node, nested);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.text, "interface Item {}\n\n");
}

#[test]
fn test_array_of_type_parameter_is_skipped() {
    let mut f = Fixture::new();
    let array = f.interface(f.services, "Array", "interface Array<T> {}\n");
    let t = f.declare(f.services, NodeKind::Unknown, "T", "T");
    let t_param = f.b.add_type(ResolvedType {
        symbol: Some(t.symbol),
        flags:  TypeFlags::TYPE_PARAMETER,
        ..Default::default()
    });
    let list = f.instantiate(array, vec![t_param]);

    let request = f.interface(f.protocol, "Request", "interface Request<T> {\n    items: T[];\n}\n");
    f.property(request.node, list);

    let (program, root) = f.finish();
    assert_eq!(run(&program, root).unwrap(), Extraction::default());
}

#[test]
fn test_string_enum_is_inlined_numeric_enum_is_stubbed() {
    let mut f = Fixture::new();
    let kind_text = "enum CompletionKind {\n    Keyword = \"keyword\",\n    Script = \"script\"\n}\n";
    let string_enum = f.enumeration(f.services, "CompletionKind", kind_text, NodeKind::StringLiteral);
    let numeric_enum = f.enumeration(
        f.services,
        "ScriptKind",
        "enum ScriptKind {\n    JS = 1,\n    TS = 3\n}\n",
        NodeKind::NumericLiteral,
    );

    let request = f.interface(f.protocol, "Request", "interface Request {\n    kind: CompletionKind;\n    script: ScriptKind;\n}\n");
    f.property(request.node, string_enum.ty);
    f.property(request.node, numeric_enum.ty);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.text, format!("{}\n", kind_text));
    assert_eq!(result.stubbed, vec!["ScriptKind".to_string()]);
    assert!(!result.text.contains("ScriptKind"));
}

#[test]
fn test_stub_is_recorded_once_per_symbol() {
    let mut f = Fixture::new();
    let numeric_enum = f.enumeration(f.services, "IndentStyle", "enum IndentStyle { None = 0 }\n", NodeKind::NumericLiteral);
    // A second type object for the same enum, e.g. a literal member type.
    let member_type = f.b.add_type(ResolvedType { symbol: Some(numeric_enum.symbol), ..Default::default() });

    let request = f.interface(f.protocol, "Request", "interface Request {}\n");
    f.property(request.node, numeric_enum.ty);
    f.property(request.node, member_type);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.stubbed, vec!["IndentStyle".to_string()]);
    assert!(result.text.is_empty());
}

#[test]
fn test_every_union_arm_is_resolved() {
    let mut f = Fixture::new();
    let a = f.interface(f.services, "TextInsertion", "interface TextInsertion {}\n");
    let b = f.interface(f.services, "TextChange", "interface TextChange {}\n");
    let request = f.interface(f.protocol, "Request", "interface Request {\n    edit: TextInsertion | TextChange;\n}\n");
    f.union_property(request.node, &[a.ty, b.ty]);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.text, "interface TextInsertion {}\n\ninterface TextChange {}\n\n");
}

#[test]
fn test_extends_clause_pulls_in_base_interface() {
    let mut f = Fixture::new();
    let base = f.interface(f.services, "Message", "interface Message {\n    seq: number;\n}\n");
    let request = f.interface(f.protocol, "Request", "interface Request extends Message {}\n");
    f.heritage(request.node, HeritageToken::Extends, base.ty);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.text, "interface Message {\n    seq: number;\n}\n\n");
}

#[test]
fn test_implements_clause_is_a_contract_violation() {
    let mut f = Fixture::new();
    let base = f.interface(f.services, "Message", "interface Message {}\n");
    let request = f.interface(f.protocol, "Request", "interface Request implements Message {}\n");
    f.heritage(request.node, HeritageToken::Implements, base.ty);

    let (program, root) = f.finish();
    let err = run(&program, root).unwrap_err();
    assert!(
        matches!(err, DtsError::UnexpectedHeritageClause { token: HeritageToken::Implements, .. }),
        "expected an UnexpectedHeritageClause but got {:?}",
        err
    );
    assert_eq!(
        err.to_string(),
        "Unexpected kind of heritage clause: implements (in interface Request)"
    );
}

#[test]
fn test_second_heritage_clause_is_validated() {
    let mut f = Fixture::new();
    let message = f.interface(f.services, "Message", "interface Message {}\n");
    let disposable = f.interface(f.services, "Disposable", "interface Disposable {}\n");
    let request = f.interface(
        f.protocol,
        "Request",
        "interface Request extends Message implements Disposable {}\n",
    );
    f.heritage(request.node, HeritageToken::Extends, message.ty);
    f.heritage(request.node, HeritageToken::Implements, disposable.ty);

    let (program, root) = f.finish();
    let err = run(&program, root).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected kind of heritage clause: implements (in interface Request)"
    );
}

#[test]
fn test_base_interface_of_spliced_declaration_is_inlined() {
    let mut f = Fixture::new();
    let args = f.interface(f.services, "FileRequestArgs", "interface FileRequestArgs extends FileArgs {}\n");
    let base = f.interface(f.services, "FileArgs", "interface FileArgs {\n    file: string;\n}\n");
    f.heritage(args.node, HeritageToken::Extends, base.ty);

    let request = f.interface(f.protocol, "Request", "interface Request {\n    args: FileRequestArgs;\n}\n");
    f.property(request.node, args.ty);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(
        result.text,
        "interface FileRequestArgs extends FileArgs {}\n\ninterface FileArgs {\n    file: string;\n}\n\n"
    );
}

#[test]
fn test_variable_and_index_signature_annotations() {
    let mut f = Fixture::new();
    let options = f.interface(f.services, "FormatOptions", "interface FormatOptions {}\n");
    let edit = f.interface(f.services, "CodeEdit", "interface CodeEdit {}\n");

    let root_node = f.b.root(f.protocol);
    let statement = f.b.add_node(root_node, NodeKind::VariableStatement);
    let variable = f.b.add_node(statement, NodeKind::VariableDeclaration { type_annotation: None });
    let variable_type = f.b.annotate(variable, NodeKind::TypeReference);
    f.b.set_type(variable_type, options.ty);

    let edits = f.interface(f.protocol, "EditMap", "interface EditMap {\n    [file: string]: CodeEdit;\n}\n");
    let index = f.b.add_node(edits.node, NodeKind::IndexSignature { type_annotation: None });
    let index_type = f.b.annotate(index, NodeKind::TypeReference);
    f.b.set_type(index_type, edit.ty);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.text, "interface FormatOptions {}\n\ninterface CodeEdit {}\n\n");
}

#[test]
fn test_method_parameters_and_return_type() {
    let mut f = Fixture::new();
    let open_args = f.interface(f.services, "OpenArgs", "interface OpenArgs {}\n");
    let open_result = f.interface(f.services, "OpenResult", "interface OpenResult {}\n");

    let session = f.interface(f.protocol, "Session", "interface Session {\n    open(args: OpenArgs): OpenResult;\n}\n");
    let method = f.b.add_node(session.node, NodeKind::MethodSignature { type_annotation: None });
    let param = f.b.add_node(method, NodeKind::Parameter { type_annotation: None });
    let param_type = f.b.annotate(param, NodeKind::TypeReference);
    f.b.set_type(param_type, open_args.ty);
    let return_type = f.b.annotate(method, NodeKind::TypeReference);
    f.b.set_type(return_type, open_result.ty);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.text, "interface OpenArgs {}\n\ninterface OpenResult {}\n\n");
}

#[test]
fn test_alias_symbol_is_preferred() {
    let mut f = Fixture::new();
    let alias = f.declare(
        f.services,
        NodeKind::TypeAliasDeclaration,
        "EventHandler",
        "type EventHandler = (name: string) => void;\n",
    );
    let anonymous_function = f.b.add_type(ResolvedType {
        alias_symbol: Some(alias.symbol),
        flags:        TypeFlags::OBJECT,
        ..Default::default()
    });
    let request = f.interface(f.protocol, "Request", "interface Request {\n    onEvent: EventHandler;\n}\n");
    f.property(request.node, anonymous_function);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.text, "type EventHandler = (name: string) => void;\n\n");
}

#[test]
fn test_generic_instantiations_share_one_declaration() {
    let mut f = Fixture::new();
    let boxed = f.interface(f.services, "Box", "interface Box<T> {\n    value: T;\n}\n");
    let a = f.interface(f.services, "A", "interface A {}\n");
    let b = f.interface(f.services, "B", "interface B {}\n");
    let box_a = f.instantiate(boxed, vec![a.ty]);
    let box_b = f.instantiate(boxed, vec![b.ty]);

    let request = f.interface(f.protocol, "Request", "interface Request {\n    a: Box<A>;\n    b: Box<B>;\n}\n");
    f.property(request.node, box_a);
    f.property(request.node, box_b);

    let (program, root) = f.finish();
    let result = run(&program, root).unwrap();
    assert_eq!(result.text.matches("interface Box<T>").count(), 1);
}

#[test]
fn test_extraction_is_idempotent() {
    let mut f = Fixture::new();
    let args = f.interface(f.services, "Args", ARGS);
    let location = f.interface(f.services, "FileLocation", FILE_LOCATION);
    f.property(args.node, location.ty);
    let request = f.interface(f.protocol, "Request", "interface Request {\n    args: Args;\n}\n");
    f.property(request.node, args.ty);

    let (program, root) = f.finish();
    let first = run(&program, root).unwrap();
    let second = run(&program, root).unwrap();
    assert_eq!(first, second);
}

fn protocol_fixture() -> Program {
    let mut f = Fixture::new();
    let args = f.interface(f.services, "Args", ARGS);
    let numeric_enum = f.enumeration(f.services, "ScriptKind", "enum ScriptKind { JS = 1 }\n", NodeKind::NumericLiteral);
    let request = f.interface(
        f.protocol,
        "Request",
        "interface Request {\n    args: Args;\n    kind: ScriptKind;\n}\n",
    );
    f.property(request.node, args.ty);
    f.property(request.node, numeric_enum.ty);
    f.finish().0
}

const EXPECTED_PROTOCOL: &str = concat!(
    "interface Request {\n    args: Args;\n    kind: ScriptKind;\n}\n",
    "declare namespace ts.server.protocol {\n",
    "\n/** Arguments of a request. */\ninterface Args {\n    file: FileLocation;\n}\n\n",
    "}",
    "\ndeclare namespace ts {\n",
    "    // ScriptKind is an empty stub for a type from services and should not be used directly\n",
    "    export type ScriptKind = never;\n",
    "}",
    "\nimport protocol = ts.server.protocol;",
    "\nexport = protocol;",
    "\nexport as namespace protocol;",
);

#[test]
fn test_build_protocol() {
    let program = protocol_fixture();
    let text = build_protocol(&program, &ProtocolConfig::default()).unwrap();
    assert_eq!(text, EXPECTED_PROTOCOL);
}

#[test]
fn test_build_protocol_from_json_snapshot() {
    let json = serde_json::to_string_pretty(&protocol_fixture()).unwrap();
    let program: Program = serde_json::from_str(&json).unwrap();
    let text = build_protocol(&program, &ProtocolConfig::default()).unwrap();
    assert_eq!(text, EXPECTED_PROTOCOL);
}

#[test]
fn test_build_protocol_with_custom_namespaces() {
    let config = ProtocolConfig::from_json(
        r#"{ "protocolNamespace": "server.api", "stubNamespace": "services", "exportAlias": "api" }"#,
    )
    .unwrap();
    let text = build_protocol(&protocol_fixture(), &config).unwrap();
    assert!(text.contains("declare namespace server.api {\n"));
    assert!(text.contains("\ndeclare namespace services {\n"));
    assert!(text.ends_with("\nimport api = server.api;\nexport = api;\nexport as namespace api;"));
}
