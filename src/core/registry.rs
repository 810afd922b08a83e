//! # 서비스 레지스트리
//!
//! `singleton_macro`의 `#[service]` / `#[repository]` 속성이 생성하는 등록 정보를
//! `inventory`로 수집하고, 타입별 싱글톤 인스턴스를 보관하는 의존성 주입 컨테이너입니다.
//!
//! ## 동작 방식
//!
//! 1. 매크로가 `ServiceRegistration` / `RepositoryRegistration`을 `inventory::submit!`으로 등록
//! 2. `main`이 인프라 인스턴스(`Database`, `RedisClient`)를 `ServiceLocator::set`으로 주입
//! 3. `ServiceLocator::initialize_all`이 모든 리포지토리 → 서비스 순서로 인스턴스를 생성
//! 4. 이후 `BookingService::instance()` 같은 호출은 캐시된 `Arc`를 반환
//!
//! 타입 이름의 접미사(`Repository`, `Service`)를 떼어낸 소문자 이름이 매크로의 `name`과
//! 일치해야 합니다. 예: `BookingService` ↔ `#[service(name = "booking")]`.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use once_cell::sync::Lazy;

/// 비즈니스 로직 서비스를 위한 공통 인터페이스
///
/// `#[service]` 매크로가 적용된 구조체가 자동 구현합니다.
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 데이터 액세스 리포지토리를 위한 공통 인터페이스
///
/// `#[repository]` 매크로가 적용된 구조체가 자동 구현합니다.
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    /// 연결된 MongoDB 컬렉션 이름
    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 서비스 등록 정보 (매크로가 생성)
pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// 리포지토리 등록 정보 (매크로가 생성)
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

type Constructor = fn() -> Box<dyn Any + Send + Sync>;

/// 정규화된 이름 → 생성자. 첫 접근 시 한 번만 구성됩니다.
static SERVICE_CONSTRUCTORS: Lazy<HashMap<String, (&'static str, Constructor)>> = Lazy::new(|| {
    let table: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|r| (normalize_registration_name(r.name), (r.name, r.constructor)))
        .collect();
    log::debug!("📚 Service 생성자 테이블 구성: {}개", table.len());
    table
});

static REPOSITORY_CONSTRUCTORS: Lazy<HashMap<String, (&'static str, Constructor)>> = Lazy::new(|| {
    let table: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
        .map(|r| (normalize_registration_name(r.name), (r.name, r.constructor)))
        .collect();
    log::debug!("📚 Repository 생성자 테이블 구성: {}개", table.len());
    table
});

/// `booking_service` / `booking_repository` → `booking`
fn normalize_registration_name(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .replace('_', "")
}

/// `travel_agency_backend::services::bookings::BookingService` → `BookingService`
fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// 싱글톤 의존성 주입 컨테이너
///
/// 각 타입당 정확히 하나의 인스턴스를 `TypeId` 기준으로 보관합니다.
/// 초기화 중인 타입을 추적하여 순환 의존성을 즉시 감지합니다.
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    initializing: RwLock<HashSet<TypeId>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    fn cached<T: 'static + Send + Sync>(type_id: TypeId) -> Option<Arc<T>> {
        let instances = LOCATOR.instances.read().unwrap_or_else(|e| e.into_inner());
        instances
            .get(&type_id)
            .and_then(|instance| instance.clone().downcast::<T>().ok())
    }

    /// 지정된 타입의 싱글톤 인스턴스를 가져옵니다.
    ///
    /// 캐시에 없으면 타입 이름으로 등록 정보를 찾아 생성합니다.
    ///
    /// # Panics
    ///
    /// * 등록되지 않은 타입을 요청한 경우 (애플리케이션 조립 오류)
    /// * 순환 의존성이 감지된 경우
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = Self::cached::<T>(type_id) {
            return instance;
        }

        {
            let mut initializing = LOCATOR.initializing.write().unwrap_or_else(|e| e.into_inner());
            if !initializing.insert(type_id) {
                panic!("Circular dependency detected: {} is already being initialized", type_name);
            }
        }

        let created = Self::construct::<T>(type_name);

        LOCATOR
            .initializing
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&type_id);

        match created {
            Ok(instance) => {
                let mut instances = LOCATOR.instances.write().unwrap_or_else(|e| e.into_inner());
                // 생성 도중 다른 스레드가 먼저 등록했다면 그 인스턴스를 사용
                let stored = instances
                    .entry(type_id)
                    .or_insert_with(|| instance.clone() as Arc<dyn Any + Send + Sync>)
                    .clone();
                stored.downcast::<T>().unwrap_or(instance)
            }
            Err(message) => {
                log::error!("❌ {}", message);
                panic!("{}", message);
            }
        }
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Result<Arc<T>, String> {
        let short_name = short_type_name(type_name);

        let (table, entity) = if let Some(entity) = short_name.strip_suffix("Repository") {
            (&*REPOSITORY_CONSTRUCTORS, entity)
        } else if let Some(entity) = short_name.strip_suffix("Service") {
            (&*SERVICE_CONSTRUCTORS, entity)
        } else {
            return Err(format!(
                "Service not found: {}. Register it with #[service]/#[repository] or ServiceLocator::set()",
                type_name
            ));
        };

        let (registered_name, constructor) = table
            .get(&entity.to_lowercase())
            .ok_or_else(|| format!("No registration found for {}", type_name))?;

        constructor()
            .downcast::<Arc<T>>()
            .map(|boxed| *boxed)
            .map_err(|_| format!("Type mismatch for registration: {}", registered_name))
    }

    /// 인프라 인스턴스를 직접 등록합니다. (`Database`, `RedisClient` 등)
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_id = TypeId::of::<T>();
        log::info!("📦 Registering: {}", short_type_name(std::any::type_name::<T>()));

        LOCATOR
            .instances
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(type_id, instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 모든 리포지토리와 서비스를 순서대로 생성합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        log::info!("🔄 서비스 레지스트리 초기화 시작");

        let repositories: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        for registration in &repositories {
            let _ = (registration.constructor)();
            log::debug!("  ✓ {}", registration.name);
        }
        log::info!("  [1/2] Repository 인스턴스 {}개 생성", repositories.len());

        let services: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        for registration in &services {
            let _ = (registration.constructor)();
            log::debug!("  ✓ {}", registration.name);
        }
        log::info!("  [2/2] Service 인스턴스 {}개 생성", services.len());

        Ok(())
    }
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);
