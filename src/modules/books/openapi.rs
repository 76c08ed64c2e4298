//! OpenAPI fragment for the books module. Paths are relative to `/api/books`.

use serde_json::{json, Value};

pub fn fragment() -> Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("All books, oldest first", json!({
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Book" }
                        })),
                        "500": error_response("Storage error")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": request_body("BookInput"),
                    "responses": {
                        "201": json_response("Created book", schema_ref("Book")),
                        "400": error_response("Validation error"),
                        "500": error_response("Storage error")
                    }
                }
            },
            "/{id}": {
                "parameters": [id_parameter("Book id")],
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("The book", schema_ref("Book")),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage error")
                    }
                },
                "put": {
                    "summary": "Replace a book",
                    "tags": ["Books"],
                    "requestBody": request_body("BookInput"),
                    "responses": {
                        "200": json_response("Updated book", schema_ref("Book")),
                        "400": error_response("Validation error"),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage error")
                    }
                },
                "delete": {
                    "summary": "Delete a book and all of its notes",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("Deletion acknowledged", schema_ref("DeleteAck")),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage error")
                    }
                }
            },
            "/{id}/notes": {
                "parameters": [id_parameter("Book id")],
                "get": {
                    "summary": "List a book's notes",
                    "tags": ["Notes"],
                    "responses": {
                        "200": json_response("Notes in insertion order", json!({
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Note" }
                        })),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage error")
                    }
                },
                "post": {
                    "summary": "Add a note to a book",
                    "tags": ["Notes"],
                    "requestBody": request_body("NoteInput"),
                    "responses": {
                        "201": json_response("Created note", schema_ref("Note")),
                        "400": error_response("Validation error"),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "ReadingStatus": {
                    "type": "string",
                    "enum": ["not_started", "in_progress", "finished"]
                },
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "status": { "$ref": "#/components/schemas/ReadingStatus" },
                        "createdAt": { "type": "string", "format": "date-time" }
                    },
                    "required": ["id", "title", "author", "status", "createdAt"]
                },
                "BookInput": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1, "maxLength": 300 },
                        "author": { "type": "string", "minLength": 1, "maxLength": 30 },
                        "status": { "$ref": "#/components/schemas/ReadingStatus" }
                    },
                    "required": ["title", "author", "status"]
                },
                "Note": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "bookId": { "type": "string", "format": "uuid" },
                        "content": { "type": "string" },
                        "createdAt": { "type": "string", "format": "date-time" }
                    },
                    "required": ["id", "bookId", "content", "createdAt"]
                },
                "NoteInput": {
                    "type": "object",
                    "properties": {
                        "content": { "type": "string", "minLength": 1, "maxLength": 500 }
                    },
                    "required": ["content"]
                },
                "DeleteAck": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" }
                    },
                    "required": ["message"]
                }
            }
        }
    })
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema }
        }
    })
}

fn error_response(description: &str) -> Value {
    json_response(description, schema_ref("ErrorResponse"))
}

fn request_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": { "schema": schema_ref(schema) }
        }
    })
}

fn id_parameter(description: &str) -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": description,
        "schema": { "type": "string" }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_reference_resolves() {
        let doc = fragment();
        let schemas = doc["components"]["schemas"].as_object().unwrap();
        let text = doc.to_string();

        for name in ["Book", "BookInput", "Note", "NoteInput", "DeleteAck"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
        // ErrorResponse lives in the shared document.
        for reference in text.split("#/components/schemas/").skip(1) {
            let name: String = reference.chars().take_while(|c| c.is_alphanumeric()).collect();
            assert!(
                schemas.contains_key(&name) || name == "ErrorResponse",
                "dangling reference to {name}"
            );
        }
    }

    #[test]
    fn covers_every_route() {
        let doc = fragment();
        let paths = &doc["paths"];

        assert!(paths["/"]["get"].is_object());
        assert!(paths["/"]["post"]["responses"]["201"].is_object());
        assert!(paths["/{id}"]["put"].is_object());
        assert!(paths["/{id}"]["delete"].is_object());
        assert!(paths["/{id}/notes"]["get"]["responses"]["404"].is_object());
        assert!(paths["/{id}/notes"]["post"].is_object());
    }
}
