//! Compilation tests: tool naming, input-schema merging, and all-or-nothing
//! failure semantics.

use gantry::compiler::{compile_tools, ToolDescriptor};
use gantry::document::loader::load_document;
use gantry::error::GantryError;
use pretty_assertions::assert_eq;
use serde_json::json;

fn compile(doc: serde_json::Value) -> Vec<ToolDescriptor> {
    let spec = load_document(doc.to_string().as_bytes()).expect("document loads");
    compile_tools(spec.as_ref()).expect("compilation succeeds")
}

fn compile_err(doc: serde_json::Value) -> GantryError {
    let spec = load_document(doc.to_string().as_bytes()).expect("document loads");
    compile_tools(spec.as_ref()).expect_err("compilation must fail")
}

#[test]
fn explicit_operation_id_becomes_the_tool_name() {
    let tools = compile(json!({
        "openapi": "3.0.0",
        "info": { "title": "Users API", "version": "1.0" },
        "paths": {
            "/users/{userId}": {
                "get": {
                    "operationId": "getUserById",
                    "parameters": [
                        { "name": "userId", "in": "path", "required": true,
                          "schema": { "type": "string" } },
                    ],
                },
            },
        },
    }));

    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "getUserById");
    assert_eq!(tools[0].method, "get");
    assert_eq!(tools[0].path, "/users/{userId}");
}

#[test]
fn derived_names_strip_braces_and_slashes() {
    let tools = compile(json!({
        "openapi": "3.0.0",
        "info": { "title": "t" },
        "paths": {
            "/": { "get": {} },
            "/users/{id}/posts/{postId}": { "post": {} },
        },
    }));

    let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"get"));
    assert!(names.contains(&"post_users_id_posts_postId"));
}

#[test]
fn description_defaults_to_method_and_path() {
    let tools = compile(json!({
        "openapi": "3.0.0",
        "info": { "title": "t" },
        "paths": {
            "/users": {
                "get": {},
                "post": { "summary": "Create a user" },
            },
        },
    }));

    let get = tools.iter().find(|t| t.method == "get").unwrap();
    let post = tools.iter().find(|t| t.method == "post").unwrap();
    assert_eq!(get.description, "GET /users");
    assert_eq!(post.description, "Create a user");
}

#[test]
fn input_schema_merges_parameters_and_flattened_body_fields() {
    let tools = compile(json!({
        "openapi": "3.0.0",
        "info": { "title": "t" },
        "paths": {
            "/teams/{teamId}/members": {
                "post": {
                    "operationId": "addMember",
                    "parameters": [
                        { "name": "teamId", "in": "path", "required": true,
                          "schema": { "type": "string" } },
                        { "name": "notify", "in": "query",
                          "schema": { "type": "boolean" } },
                    ],
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "name": { "type": "string" },
                                        "role": { "type": "string", "default": "member" },
                                    },
                                    "required": ["name"],
                                },
                            },
                        },
                    },
                },
            },
        },
    }));

    let schema = &tools[0].input_schema;
    assert!(schema.is_object());

    // Body fields sit alongside parameters, not under a "body" key.
    let keys: Vec<_> = schema.properties.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "notify", "role", "teamId"]);
    assert!(!schema.properties.contains_key("body"));

    // Required lists concatenate: parameters first, then the body schema's.
    assert_eq!(schema.required, vec!["teamId".to_string(), "name".to_string()]);
}

#[test]
fn parameter_without_schema_falls_back_to_declared_type() {
    let tools = compile(json!({
        "swagger": "2.0",
        "paths": {
            "/search": {
                "get": {
                    "parameters": [
                        { "name": "q", "in": "query", "type": "string" },
                        { "name": "page", "in": "query", "type": "integer", "format": "int32" },
                        { "name": "raw", "in": "query" },
                    ],
                },
            },
        },
    }));

    let schema = &tools[0].input_schema;
    assert_eq!(
        schema.properties["page"].schema_type.as_deref(),
        Some("integer")
    );
    assert_eq!(schema.properties["page"].format.as_deref(), Some("int32"));
    assert_eq!(
        schema.properties["page"].description.as_deref(),
        Some("Query parameter: page")
    );
    // No declared type at all still defaults to string.
    assert_eq!(
        schema.properties["raw"].schema_type.as_deref(),
        Some("string")
    );
}

#[test]
fn legacy_body_parameter_is_excluded_from_parameters_and_flattened() {
    let tools = compile(json!({
        "swagger": "2.0",
        "paths": {
            "/users": {
                "post": {
                    "operationId": "createUser",
                    "parameters": [
                        {
                            "name": "user",
                            "in": "body",
                            "required": true,
                            "schema": {
                                "type": "object",
                                "properties": {
                                    "name": { "type": "string" },
                                    "email": { "type": "string" },
                                },
                                "required": ["name", "email"],
                            },
                        },
                    ],
                },
            },
        },
    }));

    let schema = &tools[0].input_schema;
    // The body parameter itself never becomes a property.
    assert!(!schema.properties.contains_key("user"));
    assert!(schema.properties.contains_key("name"));
    assert!(schema.properties.contains_key("email"));
    assert_eq!(
        schema.required,
        vec!["name".to_string(), "email".to_string()]
    );
}

#[test]
fn duplicate_path_and_operation_parameters_are_both_walked() {
    let tools = compile(json!({
        "swagger": "2.0",
        "paths": {
            "/things/{id}": {
                "parameters": [
                    { "name": "id", "in": "path", "required": true, "type": "string" },
                ],
                "get": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "type": "integer" },
                    ],
                },
            },
        },
    }));

    let schema = &tools[0].input_schema;
    // The later, operation-level schema wins in the property map...
    assert_eq!(
        schema.properties["id"].schema_type.as_deref(),
        Some("integer")
    );
    // ...while the required list keeps both entries (observed behavior,
    // preserved deliberately).
    assert_eq!(schema.required, vec!["id".to_string(), "id".to_string()]);
}

#[test]
fn unresolved_body_reference_fails_the_whole_compilation() {
    let err = compile_err(json!({
        "swagger": "2.0",
        "paths": {
            "/healthy": { "get": { "operationId": "ping" } },
            "/users": {
                "post": {
                    "parameters": [
                        { "name": "user", "in": "body",
                          "schema": { "$ref": "#/definitions/Missing" } },
                    ],
                },
            },
        },
    }));

    // One bad operation aborts everything; no partial tool list survives.
    match err {
        GantryError::Compile { method, path, .. } => {
            assert_eq!(method, "post");
            assert_eq!(path, "/users");
        }
        other => panic!("expected Compile error, got {other:?}"),
    }
}

#[test]
fn every_declared_method_compiles_to_its_own_tool() {
    let tools = compile(json!({
        "openapi": "3.0.0",
        "info": { "title": "t" },
        "paths": {
            "/items": {
                "get": { "operationId": "listItems" },
                "post": { "operationId": "createItem" },
                "delete": { "operationId": "clearItems" },
            },
        },
    }));

    let mut names: Vec<_> = tools.iter().map(|t| t.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["clearItems", "createItem", "listItems"]);
}

#[test]
fn base_url_is_captured_per_descriptor() {
    let tools = compile(json!({
        "openapi": "3.0.0",
        "info": { "title": "t" },
        "servers": [{ "url": "https://api.example.com/v1" }],
        "paths": { "/ping": { "get": {} } },
    }));
    assert_eq!(tools[0].base_url, "https://api.example.com/v1");
}
