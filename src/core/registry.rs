//! # Service Registry
//!
//! Type-keyed singleton container behind the `#[service]` / `#[repository]`
//! macros from `singleton_macro`.
//!
//! The macros submit a [`ServiceRegistration`] / [`RepositoryRegistration`]
//! through `inventory` and generate an `instance()` accessor that calls
//! [`ServiceLocator::get`]. Lookup works by type name: `ProgramRepository`
//! resolves to the registration named `program`, `UserProgressService` to
//! `userprogress`. Registration names therefore have to be the lowercase type
//! name without the `Repository` / `Service` suffix.
//!
//! ```text
//! main
//!  ├─ ServiceLocator::set(Arc<Database>)       infrastructure, by hand
//!  ├─ ServiceLocator::set(Arc<RedisClient>)
//!  └─ ServiceLocator::initialize_all()          repositories, then services
//!        └─ constructor() → fields resolved through ServiceLocator::get::<T>()
//! ```
//!
//! Circular dependencies are detected while resolving and abort the process
//! at startup.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::utils::display_terminal::{
    print_boxed_title, print_cache_initialized, print_final_summary, print_step_complete,
    print_step_start, print_sub_task,
};

/// Lifecycle hooks implemented for every `#[service]` type
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Lifecycle hooks implemented for every `#[repository]` type
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Compile-time registration emitted by `#[service(name = "...")]`
pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// Compile-time registration emitted by `#[repository(name = "...", collection = "...")]`
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

/// Which family of registrations a type name resolves against
#[derive(Debug, Clone, Copy, PartialEq)]
enum ComponentKind {
    Repository,
    Service,
}

impl ComponentKind {
    fn suffix(&self) -> &'static str {
        match self {
            ComponentKind::Repository => "Repository",
            ComponentKind::Service => "Service",
        }
    }

    fn of(type_name: &str) -> Option<Self> {
        if type_name.ends_with("Repository") {
            Some(ComponentKind::Repository)
        } else if type_name.ends_with("Service") {
            Some(ComponentKind::Service)
        } else {
            None
        }
    }
}

static SERVICE_CONSTRUCTORS: Lazy<HashMap<String, fn() -> Box<dyn Any + Send + Sync>>> = Lazy::new(|| {
    let table: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|r| (registration_key(r.name), r.constructor))
        .collect();
    print_cache_initialized("Service", table.len());
    table
});

static REPOSITORY_CONSTRUCTORS: Lazy<HashMap<String, fn() -> Box<dyn Any + Send + Sync>>> = Lazy::new(|| {
    let table: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
        .map(|r| (registration_key(r.name), r.constructor))
        .collect();
    print_cache_initialized("Repository", table.len());
    table
});

/// Normalizes a registration name (`program_repository` → `program`)
fn registration_key(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// Last path segment of a fully qualified type name
fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// Global singleton container
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    resolving: RwLock<HashSet<TypeId>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(|| ServiceLocator {
    instances: RwLock::new(HashMap::new()),
    resolving: RwLock::new(HashSet::new()),
});

impl ServiceLocator {
    /// Returns the singleton for `T`, constructing it on first use.
    ///
    /// # Panics
    ///
    /// On a circular dependency or when no registration matches `T`. Both
    /// are wiring mistakes that surface during `initialize_all` at startup.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(existing) = Self::lookup::<T>(type_id) {
            return existing;
        }

        {
            let mut resolving = LOCATOR.resolving.write().unwrap_or_else(|p| p.into_inner());
            if !resolving.insert(type_id) {
                log::error!("Circular dependency detected for type: {}", type_name);
                panic!("Circular dependency detected: {} is already being initialized", type_name);
            }
        }

        let created = std::panic::catch_unwind(|| Self::construct::<T>(type_name));

        LOCATOR
            .resolving
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&type_id);

        match created {
            Ok(instance) => {
                let mut instances = LOCATOR.instances.write().unwrap_or_else(|p| p.into_inner());
                let stored = instances
                    .entry(type_id)
                    .or_insert_with(|| instance.clone() as Arc<dyn Any + Send + Sync>)
                    .clone();
                stored.downcast::<T>().unwrap_or(instance)
            }
            Err(cause) => {
                log::error!("Failed to create instance for {}: {:?}", type_name, cause);
                panic!("Failed to create instance for {}", type_name);
            }
        }
    }

    fn lookup<T: 'static + Send + Sync>(type_id: TypeId) -> Option<Arc<T>> {
        let instances = LOCATOR.instances.read().unwrap_or_else(|p| p.into_inner());
        instances
            .get(&type_id)
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Arc<T> {
        let short_name = short_type_name(type_name);
        let kind = ComponentKind::of(short_name).unwrap_or_else(|| {
            panic!(
                "Service not found: {}. Register it with #[service] / #[repository] or ServiceLocator::set()",
                type_name
            )
        });

        let key = short_name
            .strip_suffix(kind.suffix())
            .unwrap_or(short_name)
            .to_lowercase();

        let table = match kind {
            ComponentKind::Repository => &*REPOSITORY_CONSTRUCTORS,
            ComponentKind::Service => &*SERVICE_CONSTRUCTORS,
        };

        let constructor = table
            .get(&key)
            .unwrap_or_else(|| panic!("No {:?} registered under '{}'", kind, key));

        match constructor().downcast::<Arc<T>>() {
            Ok(instance) => *instance,
            Err(_) => panic!("Type mismatch for {:?} '{}'", kind, key),
        }
    }

    /// Registers an externally constructed singleton (database, cache, ...)
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        log::info!("📦 Registering: {}", short_type_name(std::any::type_name::<T>()));

        LOCATOR
            .instances
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// Eagerly constructs every registered repository, then every service,
    /// so wiring errors show up at boot instead of on the first request.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        print_boxed_title("🔄 BOOTSTRAPPING SERVICE REGISTRY");

        let repositories: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        if !repositories.is_empty() {
            print_step_start(1, "Creating repositories");
            for registration in &repositories {
                let _ = (registration.constructor)();
                print_sub_task(registration.name, "✓ ready");
            }
            print_step_complete(1, "Repositories created", repositories.len());
        }

        let services: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        if !services.is_empty() {
            print_step_start(2, "Creating services");
            for registration in &services {
                let _ = (registration.constructor)();
                print_sub_task(registration.name, "✓ ready");
            }
            print_step_complete(2, "Services created", services.len());
        }

        print_final_summary(repositories.len(), services.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_key_strips_suffix() {
        assert_eq!(registration_key("program_repository"), "program");
        assert_eq!(registration_key("progress_service"), "progress");
        assert_eq!(registration_key("review"), "review");
    }

    #[test]
    fn test_component_kind_detection() {
        assert_eq!(ComponentKind::of("ProgramRepository"), Some(ComponentKind::Repository));
        assert_eq!(ComponentKind::of("ProgressService"), Some(ComponentKind::Service));
        assert_eq!(ComponentKind::of("Database"), None);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(
            short_type_name("youth_hub_backend::repositories::program_repo::ProgramRepository"),
            "ProgramRepository"
        );
        assert_eq!(short_type_name("Database"), "Database");
    }

    #[test]
    fn test_every_collection_has_a_registered_repository() {
        let registered: HashSet<String> = inventory::iter::<RepositoryRegistration>()
            .map(|r| registration_key(r.name))
            .collect();

        for expected in [
            "user", "program", "review", "opportunity", "application", "event",
            "post", "comment", "achievement", "userprogress", "content",
        ] {
            assert!(registered.contains(expected), "missing repository '{}'", expected);
        }
    }

    #[test]
    fn test_repository_types_resolve_to_their_registration_key() {
        for type_name in ["UserProgressRepository", "OpportunityRepository", "ContentRepository"] {
            let kind = ComponentKind::of(type_name);
            assert_eq!(kind, Some(ComponentKind::Repository));
            let key = type_name
                .strip_suffix(ComponentKind::Repository.suffix())
                .map(str::to_lowercase);
            assert!(REPOSITORY_CONSTRUCTORS.contains_key(key.as_deref().unwrap_or_default()));
        }
    }

    #[test]
    fn test_set_then_get_returns_same_instance() {
        struct Marker(u32);

        ServiceLocator::set(Arc::new(Marker(7)));
        let first = ServiceLocator::get::<Marker>();
        let second = ServiceLocator::get::<Marker>();

        assert_eq!(first.0, 7);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
