// FIWARE tenant scope derived from a dashboard address
use super::path_address::PathAddress;

/// Multi-tenancy headers a FIWARE service expects on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiwareContext {
    pub service: String,
    pub service_path: String,
}

impl FiwareContext {
    pub const SERVICE_HEADER: &'static str = "Fiware-Service";
    pub const SERVICE_PATH_HEADER: &'static str = "Fiware-ServicePath";

    pub fn new(service: impl Into<String>, service_path: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            service_path: service_path.into(),
        }
    }
}

impl From<&PathAddress> for FiwareContext {
    fn from(address: &PathAddress) -> Self {
        // FIWARE service paths carry no trailing slash except for the root.
        let service_path = address.service_path();
        let service_path = match service_path.as_str() {
            "/" => service_path,
            sp => sp.trim_end_matches('/').to_string(),
        };
        Self::new(address.tenant(), service_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_root_service_path() {
        let address = PathAddress::new("acme", "/", "/board").unwrap();
        let ctx = FiwareContext::from(&address);
        assert_eq!(ctx, FiwareContext::new("acme", "/"));
    }

    #[test]
    fn test_context_from_nested_service_path() {
        let address = PathAddress::new("acme", "plant/line1/", "/").unwrap();
        let ctx = FiwareContext::from(&address);
        assert_eq!(ctx.service, "acme");
        assert_eq!(ctx.service_path, "/plant/line1");
    }
}
