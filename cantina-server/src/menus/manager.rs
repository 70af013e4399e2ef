//! Menu state machine and composition guards

use shared::error::{AppError, AppResult, ErrorCode};

use crate::core::ServerState;
use crate::db::models::{DailyMenu, MenuPack, MenuService, MenuStatus, MenuVariant};
use crate::db::repository::{
    ComponentRepository, DailyMenuRepository, OrderRepository, PackRepository, ServiceRepository,
    VariantRepository,
};
use crate::utils::time;

/// Daily menu lifecycle operations
#[derive(Clone)]
pub struct MenuManager {
    state: ServerState,
}

impl MenuManager {
    pub fn new(state: &ServerState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    fn menus(&self) -> DailyMenuRepository {
        DailyMenuRepository::new(self.state.db.clone())
    }

    async fn require_menu(&self, id: &str) -> AppResult<DailyMenu> {
        self.menus()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::with_message(ErrorCode::MenuNotFound, format!("Menu {} not found", id)))
    }

    /// Create a draft menu for a date (one menu per date)
    pub async fn create(&self, date: &str) -> AppResult<DailyMenu> {
        time::parse_date(date)?;

        if self.menus().find_by_date(date).await?.is_some() {
            return Err(AppError::with_message(
                ErrorCode::MenuAlreadyExists,
                format!("A menu already exists for {}", date),
            ));
        }

        let menu = DailyMenu {
            id: None,
            date: date.to_string(),
            status: MenuStatus::Draft,
            cutoff_hour: self.state.config.default_cutoff.clone(),
            packs: Vec::new(),
            services: Vec::new(),
            published_at: None,
            created_at: time::now_millis(),
        };

        let created = self.menus().create(menu).await?;
        tracing::info!(date = %date, "Menu created");
        Ok(created)
    }

    /// Publish a draft menu
    ///
    /// Composition gaps (required component without an activated variant,
    /// zero-stock activations) come back as warnings and never block; only
    /// a menu with no packs at all is rejected.
    pub async fn publish(&self, id: &str, now_ms: i64) -> AppResult<(DailyMenu, Vec<String>)> {
        let menu = self.require_menu(id).await?;
        if menu.status != MenuStatus::Draft {
            return Err(AppError::conflicting_state(menu.status.as_str(), "DRAFT"));
        }

        let mut pack_entries: Vec<&MenuPack> = Vec::new();
        for entry in menu.all_packs() {
            if !pack_entries.iter().any(|p| p.pack_id == entry.pack_id) {
                pack_entries.push(entry);
            }
        }
        if pack_entries.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::MenuHasNoPacks,
                format!("Menu for {} has no packs", menu.date),
            ));
        }

        let variants = self.menus().variants_for_date(&menu.date).await?;
        let warnings = self.composition_warnings(&pack_entries, &variants).await?;

        let published_at = menu.published_at.unwrap_or(now_ms);
        let updated = self
            .menus()
            .set_status(id, MenuStatus::Published, Some(published_at))
            .await?;

        tracing::info!(date = %updated.date, warnings = warnings.len(), "Menu published");
        Ok((updated, warnings))
    }

    async fn composition_warnings(
        &self,
        packs: &[&MenuPack],
        variants: &[MenuVariant],
    ) -> AppResult<Vec<String>> {
        let pack_repo = PackRepository::new(self.state.db.clone());
        let component_repo = ComponentRepository::new(self.state.db.clone());
        let mut warnings = Vec::new();

        for entry in packs {
            let Some(pack) = pack_repo.find_by_id(&entry.pack_id).await? else {
                warnings.push(format!(
                    "pack '{}' is no longer in the catalog",
                    entry.pack_name
                ));
                continue;
            };

            for pc in &pack.components {
                let has_variant = variants.iter().any(|v| v.component_id == pc.component_id);
                if has_variant {
                    continue;
                }
                let component_name = component_repo
                    .find_by_id(&pc.component_id)
                    .await?
                    .map(|c| c.name)
                    .unwrap_or_else(|| pc.component_id.clone());
                if pc.required {
                    warnings.push(format!(
                        "pack '{}': required component '{}' has no activated variant",
                        pack.name, component_name
                    ));
                } else {
                    warnings.push(format!(
                        "pack '{}': component '{}' has no activated variant",
                        pack.name, component_name
                    ));
                }
            }
        }

        for v in variants {
            if v.initial_stock == 0 {
                warnings.push(format!(
                    "variant '{}' is activated with zero stock",
                    v.variant_name
                ));
            }
        }

        Ok(warnings)
    }

    /// Reset a published menu back to draft (existing orders untouched)
    pub async fn unpublish(&self, id: &str) -> AppResult<DailyMenu> {
        let menu = self.require_menu(id).await?;
        if menu.status != MenuStatus::Published {
            return Err(AppError::conflicting_state(menu.status.as_str(), "PUBLISHED"));
        }
        let updated = self.menus().set_status(id, MenuStatus::Draft, None).await?;
        tracing::info!(date = %updated.date, "Menu unpublished");
        Ok(updated)
    }

    /// Lock a published menu (visibility freeze), only after its cutoff
    pub async fn lock(&self, id: &str, now_ms: i64) -> AppResult<DailyMenu> {
        let menu = self.require_menu(id).await?;
        if menu.status != MenuStatus::Published {
            return Err(AppError::conflicting_state(menu.status.as_str(), "PUBLISHED"));
        }

        let cutoff_ms =
            time::cutoff_millis(&menu.date, &menu.cutoff_hour, self.state.config.timezone)?;
        if now_ms < cutoff_ms {
            return Err(AppError::with_message(
                ErrorCode::CutoffNotReached,
                format!(
                    "Menu for {} can be locked from {} {}",
                    menu.date, menu.date, menu.cutoff_hour
                ),
            )
            .with_detail("locks_at", cutoff_ms));
        }

        let updated = self.menus().set_status(id, MenuStatus::Locked, None).await?;
        tracing::info!(date = %updated.date, "Menu locked");
        Ok(updated)
    }

    /// Reopen a locked menu for correction
    pub async fn unlock(&self, id: &str) -> AppResult<DailyMenu> {
        let menu = self.require_menu(id).await?;
        if menu.status != MenuStatus::Locked {
            return Err(AppError::conflicting_state(menu.status.as_str(), "LOCKED"));
        }
        let updated = self
            .menus()
            .set_status(id, MenuStatus::Published, None)
            .await?;
        tracing::info!(date = %updated.date, "Menu unlocked");
        Ok(updated)
    }

    /// Delete a menu
    ///
    /// The normal path deletes a draft with no orders. `force` acknowledges
    /// cascading deletion of the date's orders (non-production cleanup).
    pub async fn delete(&self, id: &str, force: bool) -> AppResult<()> {
        let menu = self.require_menu(id).await?;
        let order_repo = OrderRepository::new(self.state.db.clone());

        if force {
            // Serialize against in-flight admissions for the date
            let _guard = self.state.date_locks.acquire(&menu.date).await;
            order_repo.delete_for_date(&menu.date).await?;
            self.menus().delete_with_variants(id, &menu.date).await?;
            tracing::warn!(date = %menu.date, "Menu force-deleted with its orders");
            return Ok(());
        }

        if menu.status != MenuStatus::Draft {
            return Err(AppError::conflicting_state(menu.status.as_str(), "DRAFT"));
        }
        let orders = order_repo.find_by_date(&menu.date).await?;
        if !orders.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::MenuDeleteHasOrders,
                format!(
                    "Menu for {} has {} orders; deletion must be forced",
                    menu.date,
                    orders.len()
                ),
            ));
        }

        self.menus().delete_with_variants(id, &menu.date).await?;
        tracing::info!(date = %menu.date, "Menu deleted");
        Ok(())
    }

    /// Add a pack to the menu, snapshotting its name and price
    pub async fn add_pack(&self, id: &str, pack_id: &str) -> AppResult<DailyMenu> {
        let menu = self.require_menu(id).await?;
        if menu.status == MenuStatus::Locked {
            return Err(AppError::conflicting_state("LOCKED", "DRAFT or PUBLISHED"));
        }

        let pack = PackRepository::new(self.state.db.clone())
            .find_by_id(pack_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::PackNotFound, format!("Pack {} not found", pack_id))
            })?;
        if !pack.is_active {
            return Err(AppError::validation(format!(
                "Pack '{}' is inactive",
                pack.name
            )));
        }

        let pack_id_full = pack.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        if menu.packs.iter().any(|p| p.pack_id == pack_id_full) {
            return Err(AppError::already_exists(format!(
                "Pack '{}' on menu",
                pack.name
            )));
        }

        let entry = MenuPack {
            pack_id: pack_id_full,
            pack_name: pack.name,
            pack_price: pack.price,
        };
        self.menus().add_pack_entry(id, entry).await.map_err(Into::into)
    }

    /// Attach a service, snapshotting its cutoff and active packs
    pub async fn attach_service(&self, id: &str, service_id: &str) -> AppResult<DailyMenu> {
        let menu = self.require_menu(id).await?;
        if menu.status == MenuStatus::Locked {
            return Err(AppError::conflicting_state("LOCKED", "DRAFT or PUBLISHED"));
        }

        let service = ServiceRepository::new(self.state.db.clone())
            .find_by_id(service_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ServiceNotFound,
                    format!("Service {} not found", service_id),
                )
            })?;
        if !service.is_active || !service.is_published {
            return Err(AppError::validation(format!(
                "Service '{}' is not published",
                service.name
            )));
        }

        let service_id_full = service.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        if menu.services.iter().any(|s| s.service_id == service_id_full) {
            return Err(AppError::already_exists(format!(
                "Service '{}' on menu",
                service.name
            )));
        }

        let pack_repo = PackRepository::new(self.state.db.clone());
        let mut packs = Vec::new();
        for pack_id in &service.pack_ids {
            if let Some(pack) = pack_repo.find_by_id(pack_id).await?
                && pack.is_active
            {
                packs.push(MenuPack {
                    pack_id: pack.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
                    pack_name: pack.name,
                    pack_price: pack.price,
                });
            }
        }

        let entry = MenuService {
            service_id: service_id_full,
            service_name: service.name,
            cutoff_time: service.cutoff_time,
            packs,
        };
        self.menus().add_service_entry(id, entry).await.map_err(Into::into)
    }

    /// Activate a variant for the menu's date with an initial stock pool
    pub async fn add_variant(
        &self,
        id: &str,
        variant_id: &str,
        initial_stock: i32,
    ) -> AppResult<MenuVariant> {
        let menu = self.require_menu(id).await?;
        if menu.status == MenuStatus::Locked {
            return Err(AppError::conflicting_state("LOCKED", "DRAFT or PUBLISHED"));
        }
        if initial_stock < 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "initial_stock must be >= 0",
            ));
        }

        let variant = VariantRepository::new(self.state.db.clone())
            .find_by_id(variant_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::VariantNotFound,
                    format!("Variant {} not found", variant_id),
                )
            })?;
        if !variant.is_active {
            return Err(AppError::validation(format!(
                "Variant '{}' is inactive",
                variant.name
            )));
        }

        let component = ComponentRepository::new(self.state.db.clone())
            .find_by_id(&variant.component_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ComponentNotFound,
                    format!("Component {} not found", variant.component_id),
                )
            })?;

        let row = MenuVariant {
            id: None,
            date: menu.date.clone(),
            variant_id: variant.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
            variant_name: variant.name,
            component_id: variant.component_id.clone(),
            component_name: component.name,
            initial_stock,
            remaining_stock: initial_stock,
        };
        self.menus().add_variant_row(row).await.map_err(Into::into)
    }

    /// Remove a variant activation
    ///
    /// Only allowed while the menu is a draft that has never been published;
    /// after first publish the selection is employee-visible and can only
    /// grow.
    pub async fn remove_variant(&self, id: &str, variant_id: &str) -> AppResult<()> {
        let menu = self.require_menu(id).await?;
        if menu.status != MenuStatus::Draft || menu.published_at.is_some() {
            return Err(AppError::new(ErrorCode::VariantRemovalNotAllowed));
        }

        let removed = self
            .menus()
            .remove_variant_row(&menu.date, variant_id)
            .await?;
        if !removed {
            return Err(AppError::with_message(
                ErrorCode::VariantNotOnMenu,
                format!("Variant {} is not activated for {}", variant_id, menu.date),
            ));
        }
        Ok(())
    }

    /// Update the menu cutoff hour ("HH:MM")
    pub async fn update_cutoff(&self, id: &str, cutoff_hour: &str) -> AppResult<DailyMenu> {
        let menu = self.require_menu(id).await?;
        if menu.status == MenuStatus::Locked {
            return Err(AppError::conflicting_state("LOCKED", "DRAFT or PUBLISHED"));
        }
        time::parse_hhmm(cutoff_hour)?;
        self.menus().set_cutoff(id, cutoff_hour).await.map_err(Into::into)
    }

    /// Variant activations for a menu (detail views)
    pub async fn variants(&self, menu: &DailyMenu) -> AppResult<Vec<MenuVariant>> {
        self.menus()
            .variants_for_date(&menu.date)
            .await
            .map_err(Into::into)
    }
}
