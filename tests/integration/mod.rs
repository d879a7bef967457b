mod mcp_protocol;
mod store_properties;
