use std::env;

#[derive(Debug, Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

impl ServiceContext {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_lookup(component, |key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(component: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let component = component.trim().to_string();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let service_name = non_empty("SERVICE_NAME").unwrap_or_else(|| component.clone());
        let environment = non_empty("STAGE").unwrap_or_else(|| "unknown".to_string());

        Self {
            service_name,
            environment,
            component,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_component_and_unknown_stage() {
        let context = ServiceContext::from_lookup(" room-gate ", |_| None);

        assert_eq!(context.service_name, "room-gate");
        assert_eq!(context.environment, "unknown");
        assert_eq!(context.component, "room-gate");
    }

    #[test]
    fn prefers_explicit_service_name_and_stage() {
        let context = ServiceContext::from_lookup("room-gate", |key| match key {
            "SERVICE_NAME" => Some("rooms-prod".to_string()),
            "STAGE" => Some("production".to_string()),
            _ => None,
        });

        assert_eq!(context.service_name, "rooms-prod");
        assert_eq!(context.environment, "production");
    }
}
