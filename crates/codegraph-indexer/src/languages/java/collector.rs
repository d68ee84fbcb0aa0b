//! Phase 1: walk a Java AST and register every definition it contains.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use codegraph_core::context::{ImportEntry, ImportKind};
use codegraph_core::{
    AstHandle, ClassExtra, CodeElement, DefinitionEntry, ElementKind, EnumConstantExtra, Extra,
    ExtraKind, FieldExtra, FileContext, GlobalContext, Location, MethodExtra, NodeId,
};
use tree_sitter::{Node, Tree};

use super::qn;

struct Collector<'a> {
    ctx: &'a GlobalContext,
    file_path: &'a Path,
    source: &'a [u8],
    tree: Arc<Tree>,
    anon: qn::AnonymousCounters,
    file_ctx: FileContext,
}

pub fn collect(
    ctx: &GlobalContext,
    file_path: &Path,
    tree: Arc<Tree>,
    source: Arc<[u8]>,
) -> Result<FileContext> {
    let file_ctx = FileContext::new(file_path.to_path_buf(), Arc::clone(&tree), Arc::clone(&source));
    let mut collector = Collector {
        ctx,
        file_path,
        source: &source,
        tree: Arc::clone(&tree),
        anon: qn::AnonymousCounters::default(),
        file_ctx,
    };

    let root = tree.root_node();
    collector.collect_top_level(root);

    // Register the `File` element itself; it is the root of the per-file
    // containment subtree built during hierarchy synthesis.
    let file_qn = file_path.to_string_lossy().to_string();
    let file_element = CodeElement {
        id: NodeId::new(&file_path.to_path_buf(), ElementKind::File, &file_qn),
        kind: ElementKind::File,
        name: file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        qualified_name: file_qn,
        path: file_path.to_path_buf(),
        signature: None,
        location: None,
        doc: None,
        comment: None,
        extra: Extra::default(),
    };
    collector.ctx.register_element(file_element);

    if !collector.file_ctx.package_name.is_empty() {
        let package_name = collector.file_ctx.package_name.clone();
        collector.ctx.resolver.register_package(collector.ctx, &package_name);
    }

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        collector.walk_member(child, &collector.file_ctx.package_name.clone(), None);
    }

    Ok(collector.file_ctx)
}

impl<'a> Collector<'a> {
    fn text(&self, node: Node) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    fn collect_top_level(&mut self, root: Node) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "package_declaration" => {
                    if let Some(name_node) = child.child_by_field_name("name") {
                        self.file_ctx.package_name = self.text(name_node);
                    }
                }
                "import_declaration" => self.collect_import(child),
                _ => {}
            }
        }
    }

    fn collect_import(&mut self, node: Node) {
        let is_static = node.child(1).map(|n| n.kind() == "static").unwrap_or(false);
        let mut cursor = node.walk();
        let mut is_wildcard = false;
        let mut path_parts = Vec::new();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "scoped_identifier" | "identifier" => path_parts.push(self.text(child)),
                "asterisk" => is_wildcard = true,
                _ => {}
            }
        }
        let raw_import_path = path_parts.into_iter().next().unwrap_or_default();
        let alias = if is_wildcard {
            "*".to_string()
        } else {
            raw_import_path
                .rsplit(qn::SEPARATOR)
                .next()
                .unwrap_or(&raw_import_path)
                .to_string()
        };
        let kind = if is_wildcard {
            ImportKind::Package
        } else if is_static {
            ImportKind::Constant
        } else {
            ImportKind::Class
        };
        self.file_ctx.add_import(ImportEntry {
            raw_import_path,
            alias,
            kind,
            is_wildcard,
            location: self.location(node),
        });
    }

    fn location(&self, node: Node) -> Option<Location> {
        Some(Location {
            start_line: node.start_position().row as u32 + 1,
            end_line: node.end_position().row as u32 + 1,
            start_column: node.start_position().column as u32,
            end_column: node.end_position().column as u32,
        })
    }

    fn modifiers_and_annotations(&self, node: Node) -> (Vec<String>, Vec<String>) {
        let mut modifiers = Vec::new();
        let mut annotations = Vec::new();
        if let Some(mods) = node.child_by_field_name("modifiers") {
            let mut cursor = mods.walk();
            for child in mods.children(&mut cursor) {
                match child.kind() {
                    "marker_annotation" | "annotation" => annotations.push(self.text(child)),
                    _ if child.is_named() => modifiers.push(self.text(child)),
                    _ => {}
                }
            }
        }
        (modifiers, annotations)
    }

    /// Register a definition both in the global context and this file's
    /// short-name index, returning its id.
    fn register(
        &mut self,
        kind: ElementKind,
        name: &str,
        qualified_name: &str,
        parent_qn: &str,
        node: Node,
        extra: Extra,
    ) -> NodeId {
        let element = CodeElement {
            id: NodeId::new(&self.file_path.to_path_buf(), kind, qualified_name),
            kind,
            name: name.to_string(),
            qualified_name: qualified_name.to_string(),
            path: self.file_path.to_path_buf(),
            signature: Some(self.text(node)),
            location: self.location(node),
            doc: None,
            comment: None,
            extra,
        };
        let id = self.ctx.register_element(element);
        self.file_ctx.add_definition(
            name,
            kind,
            DefinitionEntry {
                element_id: id,
                qualified_name: qualified_name.to_string(),
                parent_qn: parent_qn.to_string(),
                ast: AstHandle::from_node(&node),
            },
        );
        id
    }

    /// Walk one member-position node. `parent_qn` is the enclosing
    /// package/type/method QN; `enclosing_type_qn` is the nearest enclosing
    /// type, used for locating record components during compact-constructor
    /// handling.
    fn walk_member(&mut self, node: Node, parent_qn: &str, enclosing_type_qn: Option<&str>) {
        match node.kind() {
            "class_declaration" | "record_declaration" => {
                self.walk_class_like(node, parent_qn, node.kind() == "record_declaration")
            }
            "interface_declaration" => self.walk_interface(node, parent_qn),
            "enum_declaration" => self.walk_enum(node, parent_qn),
            "annotation_type_declaration" => self.walk_annotation_type(node, parent_qn),
            "method_declaration" | "annotation_type_element_declaration" => {
                self.walk_method(node, parent_qn)
            }
            "constructor_declaration" => self.walk_constructor(node, parent_qn),
            "compact_constructor_declaration" => {
                self.walk_compact_constructor(node, parent_qn, enclosing_type_qn)
            }
            "field_declaration" => self.walk_field(node, parent_qn),
            "local_variable_declaration" => self.walk_local_variable(node, parent_qn),
            _ => {
                // Not a definition-producing node itself; still descend so
                // nested definitions (e.g. a local class inside a block) are
                // found.
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.walk_member(child, parent_qn, enclosing_type_qn);
                }
            }
        }
    }

    fn walk_body(&mut self, body: Node, type_qn: &str) {
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            self.walk_member(child, type_qn, Some(type_qn));
        }
    }

    fn walk_class_like(&mut self, node: Node, parent_qn: &str, is_record: bool) {
        let Some(name_node) = node.child_by_field_name("name") else { return };
        let name = self.text(name_node);
        let type_qn = qn::join(parent_qn, &name);
        let (modifiers, annotations) = self.modifiers_and_annotations(node);

        let super_class = node
            .child_by_field_name("superclass")
            .and_then(|n| n.child(1))
            .map(|n| self.text(n));
        let implemented_interfaces = node
            .child_by_field_name("interfaces")
            .map(|n| collect_type_list(n, self))
            .unwrap_or_default();

        let extra = Extra {
            modifiers: modifiers.clone(),
            annotations,
            kind: Some(ExtraKind::Class(ClassExtra {
                super_class,
                implemented_interfaces,
                is_abstract: modifiers.iter().any(|m| m == "abstract"),
                is_final: modifiers.iter().any(|m| m == "final"),
                is_builtin: false,
            })),
        };

        self.register(ElementKind::Class, &name, &type_qn, parent_qn, node, extra);

        if is_record {
            self.collect_record_components(node, &type_qn);
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_body(body, &type_qn);
        }
    }

    fn walk_interface(&mut self, node: Node, parent_qn: &str) {
        let Some(name_node) = node.child_by_field_name("name") else { return };
        let name = self.text(name_node);
        let type_qn = qn::join(parent_qn, &name);
        let (modifiers, annotations) = self.modifiers_and_annotations(node);

        let extended_interfaces = node
            .child_by_field_name("interfaces")
            .or_else(|| node.child_by_field_name("extends"))
            .map(|n| collect_type_list(n, self))
            .unwrap_or_default();

        let extra = Extra {
            modifiers,
            annotations,
            kind: Some(ExtraKind::Class(ClassExtra {
                super_class: None,
                implemented_interfaces: extended_interfaces,
                is_abstract: true,
                is_final: false,
                is_builtin: false,
            })),
        };

        self.register(ElementKind::Interface, &name, &type_qn, parent_qn, node, extra);

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_body(body, &type_qn);
        }
    }

    fn walk_annotation_type(&mut self, node: Node, parent_qn: &str) {
        let Some(name_node) = node.child_by_field_name("name") else { return };
        let name = self.text(name_node);
        let type_qn = qn::join(parent_qn, &name);
        let (modifiers, annotations) = self.modifiers_and_annotations(node);

        let extra = Extra {
            modifiers,
            annotations,
            kind: Some(ExtraKind::Class(ClassExtra::default())),
        };
        self.register(ElementKind::Annotation, &name, &type_qn, parent_qn, node, extra);

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_body(body, &type_qn);
        }
    }

    fn walk_enum(&mut self, node: Node, parent_qn: &str) {
        let Some(name_node) = node.child_by_field_name("name") else { return };
        let name = self.text(name_node);
        let type_qn = qn::join(parent_qn, &name);
        let (modifiers, annotations) = self.modifiers_and_annotations(node);

        let implemented_interfaces = node
            .child_by_field_name("interfaces")
            .map(|n| collect_type_list(n, self))
            .unwrap_or_default();

        let extra = Extra {
            modifiers,
            annotations,
            kind: Some(ExtraKind::Class(ClassExtra {
                super_class: None,
                implemented_interfaces,
                is_abstract: false,
                is_final: false,
                is_builtin: false,
            })),
        };
        self.register(ElementKind::Enum, &name, &type_qn, parent_qn, node, extra);

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.children(&mut cursor) {
                if child.kind() == "enum_constant" {
                    self.walk_enum_constant(child, &type_qn);
                } else {
                    self.walk_member(child, &type_qn, Some(&type_qn));
                }
            }
        }
    }

    fn walk_enum_constant(&mut self, node: Node, type_qn: &str) {
        let Some(name_node) = node.child_by_field_name("name") else { return };
        let name = self.text(name_node);
        let const_qn = qn::join(type_qn, &name);
        let arguments = node
            .child_by_field_name("arguments")
            .map(|n| self.text(n));

        let extra = Extra {
            modifiers: vec![],
            annotations: vec![],
            kind: Some(ExtraKind::EnumConstant(EnumConstantExtra { arguments })),
        };
        self.register(ElementKind::EnumConstant, &name, &const_qn, type_qn, node, extra);
    }

    fn walk_method(&mut self, node: Node, parent_qn: &str) {
        let Some(name_node) = node.child_by_field_name("name") else { return };
        let name = self.text(name_node);
        let (modifiers, annotations) = self.modifiers_and_annotations(node);
        let return_type = node
            .child_by_field_name("type")
            .map(|n| self.text(n))
            .filter(|t| t != "void");
        let throws_types = node
            .child_by_field_name("throws")
            .or_else(|| find_child_of_kind(node, "throws"))
            .map(|n| collect_type_list(n, self))
            .unwrap_or_default();

        let (param_types, params_display) = self.collect_params(node);
        let method_qn = qn::method_qn(parent_qn, &name, &param_types);
        let display_qn = qn::method_display_qn(parent_qn, &name, &params_display);

        let extra = Extra {
            modifiers,
            annotations,
            kind: Some(ExtraKind::Method(MethodExtra {
                is_constructor: false,
                return_type,
                parameters: params_display,
                throws_types,
                include_param_name_qn: display_qn,
            })),
        };

        let method_node_qn = method_qn.clone();
        self.register(ElementKind::Method, &name, &method_node_qn, parent_qn, node, extra);

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_body(body, &method_node_qn);
        }
    }

    fn walk_constructor(&mut self, node: Node, parent_qn: &str) {
        let name = parent_qn
            .rsplit(qn::SEPARATOR)
            .next()
            .unwrap_or(parent_qn)
            .to_string();
        let (modifiers, annotations) = self.modifiers_and_annotations(node);
        let throws_types = node
            .child_by_field_name("throws")
            .or_else(|| find_child_of_kind(node, "throws"))
            .map(|n| collect_type_list(n, self))
            .unwrap_or_default();

        let (param_types, params_display) = self.collect_params(node);
        let method_qn = qn::method_qn(parent_qn, &name, &param_types);
        let display_qn = qn::method_display_qn(parent_qn, &name, &params_display);

        let extra = Extra {
            modifiers,
            annotations,
            kind: Some(ExtraKind::Method(MethodExtra {
                is_constructor: true,
                return_type: None,
                parameters: params_display,
                throws_types,
                include_param_name_qn: display_qn,
            })),
        };

        let method_node_qn = method_qn.clone();
        self.register(ElementKind::Method, &name, &method_node_qn, parent_qn, node, extra);

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_body(body, &method_node_qn);
        }
    }

    fn walk_compact_constructor(
        &mut self,
        node: Node,
        parent_qn: &str,
        enclosing_type_qn: Option<&str>,
    ) {
        let type_qn = enclosing_type_qn.unwrap_or(parent_qn);
        let name = type_qn.rsplit(qn::SEPARATOR).next().unwrap_or(type_qn).to_string();
        let (modifiers, annotations) = self.modifiers_and_annotations(node);

        // A compact constructor's implicit parameters are the record's
        // components, already registered as fields on the record. Mirror
        // them as Variable entries scoped under this constructor so body
        // resolution finds them without a qualifier.
        let method_qn = qn::join(type_qn, &format!("{name}()"));
        let component_names: Vec<String> = self
            .file_ctx
            .definitions_by_sn
            .iter()
            .filter(|(_, defs)| defs.iter().any(|d| d.parent_qn == type_qn))
            .map(|(n, _)| n.clone())
            .collect();

        let extra = Extra {
            modifiers,
            annotations,
            kind: Some(ExtraKind::Method(MethodExtra {
                is_constructor: true,
                return_type: None,
                parameters: vec![],
                throws_types: vec![],
                include_param_name_qn: method_qn.clone(),
            })),
        };
        self.register(ElementKind::Method, &name, &method_qn, type_qn, node, extra);

        for component in component_names {
            let var_qn = qn::join(&method_qn, &component);
            let var_extra = Extra::default();
            self.register(
                ElementKind::Variable,
                &component,
                &var_qn,
                &method_qn,
                node,
                var_extra,
            );
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_body(body, &method_qn);
        }
    }

    fn collect_record_components(&mut self, node: Node, type_qn: &str) {
        let Some(params) = node.child_by_field_name("parameters") else { return };
        let mut cursor = params.walk();
        for param in params.children(&mut cursor) {
            if param.kind() != "formal_parameter" {
                continue;
            }
            let Some(name_node) = param.child_by_field_name("name") else { continue };
            let name = self.text(name_node);
            let component_type = param
                .child_by_field_name("type")
                .map(|n| self.text(n));

            let field_qn = qn::join(type_qn, &name);
            let field_extra = Extra {
                modifiers: vec!["final".to_string()],
                annotations: vec![],
                kind: Some(ExtraKind::Field(FieldExtra {
                    r#type: component_type.clone(),
                    is_constant: true,
                })),
            };
            self.register(ElementKind::Field, &name, &field_qn, type_qn, param, field_extra);

            // Synthesized accessor method, per record-accessor rule.
            let accessor_qn = qn::accessor_qn(type_qn, &name);
            let accessor_extra = Extra {
                modifiers: vec!["public".to_string()],
                annotations: vec![],
                kind: Some(ExtraKind::Method(MethodExtra {
                    is_constructor: false,
                    return_type: component_type,
                    parameters: vec![],
                    throws_types: vec![],
                    include_param_name_qn: accessor_qn.clone(),
                })),
            };
            self.register(
                ElementKind::Method,
                &name,
                &accessor_qn,
                type_qn,
                param,
                accessor_extra,
            );
        }
    }

    fn collect_params(&self, node: Node) -> (Vec<String>, Vec<String>) {
        let mut types = Vec::new();
        let mut display = Vec::new();
        let Some(params) = node.child_by_field_name("parameters") else {
            return (types, display);
        };
        let mut cursor = params.walk();
        for param in params.children(&mut cursor) {
            match param.kind() {
                "formal_parameter" | "spread_parameter" => {
                    let type_text = param
                        .child_by_field_name("type")
                        .map(|n| self.text(n))
                        .unwrap_or_default();
                    let name_text = param
                        .child_by_field_name("name")
                        .map(|n| self.text(n))
                        .unwrap_or_default();
                    let type_text = if param.kind() == "spread_parameter" {
                        format!("{type_text}...")
                    } else {
                        type_text
                    };
                    display.push(format!("{type_text} {name_text}"));
                    types.push(type_text);
                }
                _ => {}
            }
        }
        (types, display)
    }

    fn walk_field(&mut self, node: Node, parent_qn: &str) {
        let (modifiers, annotations) = self.modifiers_and_annotations(node);
        let field_type = node.child_by_field_name("type").map(|n| self.text(n));
        let is_constant = modifiers.iter().any(|m| m == "final");

        let mut cursor = node.walk();
        for declarator in node.children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = declarator.child_by_field_name("name") else { continue };
            let name = self.text(name_node);
            let field_qn = qn::join(parent_qn, &name);
            let extra = Extra {
                modifiers: modifiers.clone(),
                annotations: annotations.clone(),
                kind: Some(ExtraKind::Field(FieldExtra {
                    r#type: field_type.clone(),
                    is_constant,
                })),
            };
            self.register(ElementKind::Field, &name, &field_qn, parent_qn, declarator, extra);
        }
    }

    fn walk_local_variable(&mut self, node: Node, parent_qn: &str) {
        let var_type = node.child_by_field_name("type").map(|n| self.text(n));
        let mut cursor = node.walk();
        for declarator in node.children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = declarator.child_by_field_name("name") else { continue };
            let name = self.text(name_node);
            let var_qn = qn::join(parent_qn, &name);
            let extra = Extra {
                modifiers: vec![],
                annotations: vec![],
                kind: Some(ExtraKind::Field(FieldExtra {
                    r#type: var_type.clone(),
                    is_constant: false,
                })),
            };
            self.register(ElementKind::Variable, &name, &var_qn, parent_qn, declarator, extra);

            // An anonymous/local class may appear in the initializer; descend
            // to find it even though this node itself is not a container.
            if let Some(value) = declarator.child_by_field_name("value") {
                self.walk_expression_for_nested_types(value, parent_qn);
            }
        }
    }

    /// Descend into an expression looking for `object_creation_expression`
    /// nodes with an anonymous class body, and for local class declarations
    /// nested in lambda/statement bodies.
    fn walk_expression_for_nested_types(&mut self, node: Node, parent_qn: &str) {
        if node.kind() == "object_creation_expression" {
            if let Some(anon_body) = find_child_of_kind(node, "class_body") {
                let anon_name = self.anon.next(parent_qn);
                let anon_qn = qn::join(parent_qn, &anon_name);
                let super_type = node.child_by_field_name("type").map(|n| self.text(n));
                let extra = Extra {
                    modifiers: vec![],
                    annotations: vec![],
                    kind: Some(ExtraKind::Class(ClassExtra {
                        super_class: super_type,
                        implemented_interfaces: vec![],
                        is_abstract: false,
                        is_final: true,
                        is_builtin: false,
                    })),
                };
                self.register(ElementKind::Class, &anon_name, &anon_qn, parent_qn, node, extra);
                self.walk_body(anon_body, &anon_qn);
            }
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_expression_for_nested_types(child, parent_qn);
        }
    }
}

fn collect_type_list(node: Node, collector: &Collector) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_named() {
            out.push(collector.text(child));
        }
    }
    out
}

fn find_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}
