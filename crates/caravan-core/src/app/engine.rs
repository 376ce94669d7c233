//! FleetEngine - mover lifecycle の状態機械
//!
//! すべての lifecycle 操作は同じ流れです：
//! 1. commit gate を共有で取り、mover id のロックを取る（同じ mover への操作は 1 本ずつ）
//! 2. Mover Store から現在の mover を読む
//! 3. 遷移を検証する（検証が終わるまで何も書かない）
//! 4. mover を書き戻す
//! 5. Mission Log に 1 件追記する（失敗したら 4 を元に戻してエラーを返す）
//!
//! 読み取り側は 4 と 5 の間の状態を見ません。単一 mover の読み取りは mover ロックを、
//! 一覧系（list / ranking / counts）は commit gate を排他で取ります。

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

use super::locks::KeyedLocks;
use super::ranking::rank_movers;
use super::status::FleetCounts;
use crate::domain::{
    FleetError, Item, ItemFilter, ItemId, ItemPatch, LogFilter, MissionAction, MissionLogEntry,
    Mover, MoverFilter, MoverId, NewItem, NewLogEntry, NewMover, Result, StoreError,
};
use crate::ports::{Clock, ItemStore, MissionLog, MoverStore};

/// The fleet lifecycle engine.
///
/// Sole writer of movers and mission log entries. Items are written only through
/// the item store; the engine coordinates item edits with carriage so that a
/// carried item's weight never changes underneath a mover.
///
/// Lock order is commit gate, then mover, then item. Item-only operations take
/// just the item lock.
pub struct FleetEngine {
    items: Arc<dyn ItemStore>,
    movers: Arc<dyn MoverStore>,
    log: Arc<dyn MissionLog>,
    clock: Arc<dyn Clock>,
    mover_locks: KeyedLocks<MoverId>,
    item_locks: KeyedLocks<ItemId>,
    /// Shared by in-flight lifecycle operations, exclusive for fleet-wide reads.
    commit_gate: RwLock<()>,
    top_movers_limit: Option<usize>,
}

impl FleetEngine {
    pub(crate) fn new(
        items: Arc<dyn ItemStore>,
        movers: Arc<dyn MoverStore>,
        log: Arc<dyn MissionLog>,
        clock: Arc<dyn Clock>,
        top_movers_limit: Option<usize>,
    ) -> Self {
        Self {
            items,
            movers,
            log,
            clock,
            mover_locks: KeyedLocks::new(),
            item_locks: KeyedLocks::new(),
            commit_gate: RwLock::new(()),
            top_movers_limit,
        }
    }

    // ── Lifecycle ──

    /// Creates a resting, empty mover and logs `resting`.
    #[instrument(skip_all, fields(weight_limit = weight_limit))]
    pub async fn add_mover(&self, name: impl Into<String>, weight_limit: f64) -> Result<Mover> {
        let new = NewMover::new(name, weight_limit);
        new.validate()
            .inspect_err(|err| debug!(error = %err, "add mover rejected"))?;

        let _gate = self.commit_gate.read().await;
        let mover = self.movers.create(new).await?;
        let _guard = self.mover_locks.lock(mover.id).await;

        if let Err(err) = self.append(mover.id, MissionAction::Resting).await {
            error!(mover_id = %mover.id, error = %err, "mission log append failed; removing new mover");
            if let Err(undo) = self.movers.delete(mover.id).await {
                error!(mover_id = %mover.id, error = %undo, "failed to remove mover after log failure");
            }
            return Err(err.into());
        }

        debug!(mover_id = %mover.id, "mover added");
        Ok(mover)
    }

    /// Loads `item_id` onto `mover_id`.
    ///
    /// Logs `loading` only when the mover was resting. Capacity is checked against
    /// the mover's weight as read under its lock, so concurrent loads cannot overshoot.
    #[instrument(skip_all, fields(mover_id = %mover_id, item_id = %item_id))]
    pub async fn load_item(&self, mover_id: MoverId, item_id: ItemId) -> Result<Mover> {
        let _gate = self.commit_gate.read().await;
        let _mover_guard = self.mover_locks.lock(mover_id).await;
        let mover = self.require_mover(mover_id).await?;

        let _item_guard = self.item_locks.lock(item_id).await;
        let item = self.require_item(item_id).await?;

        let mut next = mover.clone();
        let action = next
            .load(&item)
            .inspect_err(|err| debug!(error = %err, "load rejected"))?;

        // next.load accepted, so this mover does not carry it; any carrier is another mover
        if let Some(carrier) = self.carrier_of(item_id).await? {
            debug!(carrier = %carrier, "load rejected: item carried elsewhere");
            return Err(FleetError::ItemAlreadyCarried { item_id, carrier });
        }

        let updated = self.commit(&mover, next, action).await?;
        debug!(
            current_weight = updated.current_weight,
            weight_limit = updated.weight_limit,
            "item loaded"
        );
        Ok(updated)
    }

    /// Loading -> OnMission.
    #[instrument(skip_all, fields(mover_id = %mover_id))]
    pub async fn start_mission(&self, mover_id: MoverId) -> Result<Mover> {
        self.transition(mover_id, Mover::start_mission).await
    }

    /// OnMission -> Resting; clears cargo and counts the mission.
    #[instrument(skip_all, fields(mover_id = %mover_id))]
    pub async fn end_mission(&self, mover_id: MoverId) -> Result<Mover> {
        self.transition(mover_id, Mover::end_mission).await
    }

    // ── Queries ──

    pub async fn get_mover(&self, mover_id: MoverId) -> Result<Mover> {
        let _guard = self.mover_locks.lock(mover_id).await;
        self.require_mover(mover_id).await
    }

    /// Movers in creation order.
    pub async fn list_movers(&self, filter: &MoverFilter) -> Result<Vec<Mover>> {
        self.committed_movers(filter).await
    }

    /// Movers by completed missions, highest first; ties in creation order.
    ///
    /// `None` falls back to the configured default limit (unlimited if unset).
    pub async fn top_movers(&self, limit: Option<usize>) -> Result<Vec<Mover>> {
        let movers = self.committed_movers(&MoverFilter::default()).await?;
        Ok(rank_movers(movers, limit.or(self.top_movers_limit)))
    }

    /// The mover's mission log, in append order.
    pub async fn mission_log(&self, mover_id: MoverId) -> Result<Vec<MissionLogEntry>> {
        let _guard = self.mover_locks.lock(mover_id).await;
        self.require_mover(mover_id).await?;
        Ok(self.log.list(&LogFilter::for_mover(mover_id)).await?)
    }

    pub async fn fleet_counts(&self) -> Result<FleetCounts> {
        let movers = self.committed_movers(&MoverFilter::default()).await?;
        Ok(FleetCounts::tally(&movers))
    }

    // ── Items ──

    #[instrument(skip_all, fields(weight = weight))]
    pub async fn create_item(&self, name: impl Into<String>, weight: f64) -> Result<Item> {
        let new = NewItem::new(name, weight);
        new.validate()?;
        let item = self.items.create(new).await?;
        debug!(item_id = %item.id, "item created");
        Ok(item)
    }

    pub async fn get_item(&self, item_id: ItemId) -> Result<Item> {
        self.require_item(item_id).await
    }

    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        Ok(self.items.list(filter).await?)
    }

    /// Updates an item. Changing the weight of a carried item is rejected.
    #[instrument(skip_all, fields(item_id = %item_id))]
    pub async fn update_item(&self, item_id: ItemId, patch: ItemPatch) -> Result<Item> {
        patch.validate()?;
        let _guard = self.item_locks.lock(item_id).await;
        let item = self.require_item(item_id).await?;

        if patch.changes_weight_of(&item)
            && let Some(carrier) = self.carrier_of(item_id).await?
        {
            debug!(carrier = %carrier, "update rejected: item is carried");
            return Err(FleetError::ItemInUse { item_id, carrier });
        }

        self.items
            .update(item_id, patch)
            .await?
            .ok_or(FleetError::ItemNotFound(item_id))
    }

    /// Deletes an item. `false` if it did not exist; rejected while carried.
    #[instrument(skip_all, fields(item_id = %item_id))]
    pub async fn delete_item(&self, item_id: ItemId) -> Result<bool> {
        let _guard = self.item_locks.lock(item_id).await;

        if let Some(carrier) = self.carrier_of(item_id).await? {
            debug!(carrier = %carrier, "delete rejected: item is carried");
            return Err(FleetError::ItemInUse { item_id, carrier });
        }

        Ok(self.items.delete(item_id).await?)
    }

    // ── Internals ──

    async fn transition(
        &self,
        mover_id: MoverId,
        step: impl FnOnce(&mut Mover) -> Result<MissionAction>,
    ) -> Result<Mover> {
        let _gate = self.commit_gate.read().await;
        let _guard = self.mover_locks.lock(mover_id).await;
        let mover = self.require_mover(mover_id).await?;

        let mut next = mover.clone();
        let action = step(&mut next).inspect_err(|err| debug!(error = %err, "transition rejected"))?;

        let updated = self.commit(&mover, next, Some(action)).await?;
        debug!(state = %updated.state, "transition accepted");
        Ok(updated)
    }

    /// Writes `after`, then appends `action`. If the append fails, `before` is
    /// restored so no transition stays visible without its log entry.
    ///
    /// Caller must hold the commit gate and the mover lock.
    async fn commit(
        &self,
        before: &Mover,
        after: Mover,
        action: Option<MissionAction>,
    ) -> Result<Mover> {
        let id = after.id;
        let updated = self
            .movers
            .update(id, after.patch())
            .await?
            .ok_or(FleetError::MoverNotFound(id))?;

        let Some(action) = action else {
            return Ok(updated);
        };

        if let Err(err) = self.append(id, action).await {
            error!(mover_id = %id, %action, error = %err, "mission log append failed; restoring mover");
            if let Err(undo) = self.movers.update(id, before.patch()).await {
                error!(mover_id = %id, error = %undo, "failed to restore mover after log failure");
            }
            return Err(err.into());
        }
        Ok(updated)
    }

    async fn append(
        &self,
        mover_id: MoverId,
        action: MissionAction,
    ) -> std::result::Result<MissionLogEntry, StoreError> {
        self.log
            .append(NewLogEntry {
                mover_id,
                action,
                timestamp: self.clock.now(),
            })
            .await
    }

    /// Mover listing that waits out in-flight commits.
    async fn committed_movers(&self, filter: &MoverFilter) -> Result<Vec<Mover>> {
        let _gate = self.commit_gate.write().await;
        Ok(self.movers.list(filter).await?)
    }

    async fn require_mover(&self, mover_id: MoverId) -> Result<Mover> {
        self.movers
            .get(mover_id)
            .await?
            .ok_or(FleetError::MoverNotFound(mover_id))
    }

    async fn require_item(&self, item_id: ItemId) -> Result<Item> {
        self.items
            .get(item_id)
            .await?
            .ok_or(FleetError::ItemNotFound(item_id))
    }

    async fn carrier_of(&self, item_id: ItemId) -> Result<Option<MoverId>> {
        let carriers = self.movers.list(&MoverFilter::carrying(item_id)).await?;
        Ok(carriers.first().map(|m| m.id))
    }
}
