use crate::config::AppConfig;
use crate::models::principals::entities::PrincipalKind;
use crate::models::principals::requests::CreatePrincipalRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::{ImageStore, JwtUtils};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub jwt: JwtUtils,
    pub images: ImageStore,
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 初始化默认管理员账号
/// 管理员表为空时写入一个默认管理员
pub async fn seed_admin(storage: &Arc<dyn Storage>, config: &AppConfig) {
    match storage.count_principals(PrincipalKind::Administrator).await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} admin(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No admins found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count admins: {}, skipping admin seed", e);
            return;
        }
    }

    // 未配置密码时生成随机密码，只打印这一次
    let password = config.admin.password.clone().unwrap_or_else(|| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreatePrincipalRequest {
        email: config.admin.email.clone(),
        password: password_hash,
        first_name: "System".to_string(),
        last_name: "Administrator".to_string(),
        phone_number: None,
        email_auth: None,
        four_digit_code: None,
        profile_image: None,
    };

    match storage
        .create_principal(PrincipalKind::Administrator, admin_request)
        .await
    {
        Ok(admin) => {
            info!(
                "Default admin account created successfully (ID: {}, email: {})",
                admin.id(),
                admin.email()
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、令牌编解码器和图片存储
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AppConfig::get();

    let storage = crate::storage::create_storage(&config.database)
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    seed_admin(&storage, config).await;

    let images = ImageStore::new(&config.upload);
    if let Err(e) = std::fs::create_dir_all(&config.upload.dir) {
        warn!("Failed to create upload directory {}: {}", config.upload.dir, e);
    }

    StartupContext {
        storage,
        jwt: JwtUtils::new(&config.jwt),
        images,
    }
}
