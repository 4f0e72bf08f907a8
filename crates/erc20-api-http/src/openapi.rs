//! OpenAPI 3 description of the API, served at `/docs`.

use serde_json::{json, Value};

const ADDRESS_PATTERN: &str = "^0x[a-fA-F0-9]{40}$";

fn address_schema(description: &str, example: &str) -> Value {
    json!({
        "type": "string",
        "pattern": ADDRESS_PATTERN,
        "description": description,
        "example": example,
    })
}

fn amount_schema(description: &str, example: &str) -> Value {
    json!({ "type": "string", "description": description, "example": example })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
    })
}

fn ok_response(description: &str, schema: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": format!("#/components/schemas/{schema}") } }
        }
    })
}

fn write_operation(summary: &str, properties: Value, required: &[&str]) -> Value {
    json!({
        "post": {
            "summary": summary,
            "requestBody": {
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "type": "object", "properties": properties, "required": required }
                    }
                }
            },
            "responses": {
                "200": ok_response("Transaction mined (status 0 means it reverted)", "TxResult"),
                "400": error_response("Validation error, missing signer or RPC failure"),
            }
        }
    })
}

fn path_param(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "description": description,
        "schema": { "type": "string", "pattern": ADDRESS_PATTERN },
    })
}

/// The OpenAPI document.
pub fn document() -> Value {
    let example = "0x8626f6940E2eb28930eFb4CeF49B2d1F2C9C1199";

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "ERC20 Token API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "REST API for interacting with a deployed ERC20 contract",
        },
        "paths": {
            "/health": {
                "get": {
                    "summary": "Health check",
                    "responses": {
                        "200": {
                            "description": "Server is up",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "ok": { "type": "boolean", "example": true } }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "/api/token": {
                "get": {
                    "summary": "Token metadata and total supply",
                    "responses": {
                        "200": ok_response("Token info", "TokenInfo"),
                        "500": error_response("RPC failure"),
                    }
                }
            },
            "/api/balance/{address}": {
                "get": {
                    "summary": "Token balance of an address",
                    "parameters": [path_param("address", "Holder address")],
                    "responses": {
                        "200": ok_response("Balance", "BalanceInfo"),
                        "400": error_response("Invalid address or RPC failure"),
                    }
                }
            },
            "/api/allowance/{owner}/{spender}": {
                "get": {
                    "summary": "Amount a spender may move on behalf of an owner",
                    "parameters": [
                        path_param("owner", "Token owner"),
                        path_param("spender", "Approved spender"),
                    ],
                    "responses": {
                        "200": ok_response("Allowance", "AllowanceInfo"),
                        "400": error_response("Invalid address or RPC failure"),
                    }
                }
            },
            "/api/approve": write_operation(
                "Approve a spender for the server wallet's tokens",
                json!({
                    "spender": address_schema("Spender address", example),
                    "amount": amount_schema("Amount in whole tokens", "100.0"),
                }),
                &["spender", "amount"],
            ),
            "/api/transferFrom": write_operation(
                "Move tokens from an owner using the server wallet's allowance",
                json!({
                    "from": address_schema("Token owner", example),
                    "to": address_schema("Recipient", example),
                    "amount": amount_schema("Amount in whole tokens", "10.5"),
                }),
                &["from", "to", "amount"],
            ),
            "/api/transfer": write_operation(
                "Transfer tokens from the server wallet",
                json!({
                    "to": address_schema("Recipient", example),
                    "amount": amount_schema("Amount in whole tokens", "100"),
                }),
                &["to", "amount"],
            ),
            "/api/mint": write_operation(
                "Mint tokens (server wallet must be the contract owner)",
                json!({
                    "to": address_schema("Recipient", example),
                    "amount": amount_schema("Amount in whole tokens", "42.0"),
                }),
                &["to", "amount"],
            ),
        },
        "components": {
            "schemas": {
                "Error": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } },
                },
                "TxResult": {
                    "type": "object",
                    "properties": {
                        "hash": { "type": "string", "description": "Transaction hash" },
                        "status": { "type": "integer", "enum": [0, 1] },
                    },
                },
                "TokenInfo": {
                    "type": "object",
                    "properties": {
                        "address": { "type": "string" },
                        "name": { "type": "string" },
                        "symbol": { "type": "string" },
                        "decimals": { "type": "integer" },
                        "totalSupply": { "type": "string" },
                        "totalSupplyFormatted": { "type": "string" },
                    },
                },
                "BalanceInfo": {
                    "type": "object",
                    "properties": {
                        "address": { "type": "string" },
                        "balance": { "type": "string" },
                        "balanceFormatted": { "type": "string" },
                    },
                },
                "AllowanceInfo": {
                    "type": "object",
                    "properties": {
                        "owner": { "type": "string" },
                        "spender": { "type": "string" },
                        "allowance": { "type": "string" },
                        "allowanceFormatted": { "type": "string" },
                    },
                },
            }
        }
    })
}
