use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use themesync_model::{Document, Sheet};

use crate::assemble::StoreWorkspace;
use crate::channels::{fill_channel_defaults, resolve_channels, ColorSource};
use crate::config::{StoreKind, SyncConfig};
use crate::detect::{detect, source_color_sheet, MappingMode};
use crate::locator::{find_theme, locate_theme, next_id, parse_id, Located};
use crate::ordering::{append_order_row, insert_sorted, OrderingError};
use crate::report::{OrderingOutcome, SyncReport, SyncWarning};
use crate::series::{copy_series_columns, find_siblings, SiblingCandidate, SiblingPolicy};
use crate::status::{select_field, Selection, SelectionContext, StatusFlags};
use crate::sync::{align_row, stamp_row, synchronize_fields, Alignment, RowStamp};
use crate::SyncError;

/// Whether a run may create a missing theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpsertMode {
    #[default]
    CreateOrUpdate,
    /// Fail with [`SyncError::ThemeNotFound`] instead of creating.
    UpdateOnly,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncRequest {
    pub theme_name: String,
    pub mode: UpsertMode,
}

impl SyncRequest {
    pub fn new(theme_name: impl Into<String>) -> Self {
        Self {
            theme_name: theme_name.into(),
            mode: UpsertMode::CreateOrUpdate,
        }
    }

    pub fn update_only(mut self) -> Self {
        self.mode = UpsertMode::UpdateOnly;
        self
    }
}

/// Documents ready to be handed to the persistence collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledStores {
    pub primary: Document,
    pub companion: Document,
}

/// All state of one synchronization run.
///
/// Owns the source document and working copies of both stores; nothing is
/// shared between sessions.
pub struct SyncSession {
    config: SyncConfig,
    source: Document,
    primary: StoreWorkspace,
    companion: StoreWorkspace,
    sibling_policy: Box<dyn SiblingPolicy>,
}

impl fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSession")
            .field("source", &self.source.name())
            .field("primary", &self.primary.document_name())
            .field("companion", &self.companion.document_name())
            .finish_non_exhaustive()
    }
}

impl SyncSession {
    pub fn new(
        config: SyncConfig,
        source: Document,
        primary: Document,
        companion: Document,
    ) -> Result<Self, SyncError> {
        let primary = workspace(&config, StoreKind::Primary, primary)?;
        let companion = workspace(&config, StoreKind::Companion, companion)?;
        let sibling_policy = Box::new(config.series.tie_break);
        Ok(Self {
            config,
            source,
            primary,
            companion,
            sibling_policy,
        })
    }

    /// Replace the sibling tie-break rule.
    pub fn with_sibling_policy(mut self, policy: impl SiblingPolicy + 'static) -> Self {
        self.sibling_policy = Box::new(policy);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Current state of a store sheet, including uncommitted changes.
    pub fn sheet(&self, store: StoreKind, name: &str) -> Option<&Sheet> {
        self.store(store).sheet(name)
    }

    /// Current state of a store's primary sheet.
    pub fn primary_sheet(&self, store: StoreKind) -> Option<&Sheet> {
        self.store(store).primary()
    }

    fn store(&self, store: StoreKind) -> &StoreWorkspace {
        match store {
            StoreKind::Primary => &self.primary,
            StoreKind::Companion => &self.companion,
        }
    }

    fn store_mut(&mut self, store: StoreKind) -> &mut StoreWorkspace {
        match store {
            StoreKind::Primary => &mut self.primary,
            StoreKind::Companion => &mut self.companion,
        }
    }

    /// Look `name` up without creating it.
    pub fn find(&self, name: &str) -> Result<Option<Located>, SyncError> {
        let layout = &self.config.primary;
        let sheet = self.primary.primary().ok_or_else(|| SyncError::MissingSheet {
            store: StoreKind::Primary,
            sheet: self.primary.primary_sheet_name().to_string(),
        })?;
        if sheet.column_index(&layout.key_column).is_none() {
            return Err(SyncError::MissingKeyColumn {
                sheet: sheet.name().to_string(),
                column: layout.key_column.clone(),
            });
        }
        Ok(find_theme(sheet, &layout.key_column, name).map(|index| Located {
            index,
            is_new: false,
            id: sheet
                .column_index(&layout.id_column)
                .map(|col| parse_id(sheet.cell(index, col))),
        }))
    }

    /// Find or create `name` on the primary store's primary sheet.
    ///
    /// Idempotent within a session: a second call returns the row the first
    /// call created.
    pub fn locate(&mut self, name: &str) -> Result<Located, SyncError> {
        let sheet_name = self.primary.primary_sheet_name().to_string();
        let layout = &self.config.primary;
        let sheet = self
            .primary
            .sheet_mut(&sheet_name)
            .ok_or(SyncError::MissingSheet {
                store: StoreKind::Primary,
                sheet: sheet_name.clone(),
            })?;
        locate_theme(sheet, &layout.key_column, &layout.id_column, name)
    }

    /// Synchronize one theme into both stores.
    pub fn run(&mut self, request: &SyncRequest) -> Result<SyncReport, SyncError> {
        let name = request.theme_name.trim().to_string();
        if name.is_empty() {
            return Err(SyncError::EmptyThemeName);
        }

        let mut warnings = Vec::new();
        let detection = detect(&self.source);
        if let Some(reason) = &detection.fallback_reason {
            warnings.push(SyncWarning::StatusUnreadable {
                reason: reason.to_string(),
            });
        }
        let mode = detection.mode;
        let flags = detection.status.unwrap_or_default();
        log::info!("synchronizing theme `{name}` ({} mode)", mode.as_str());

        self.check_store_alignment(&mut warnings);
        if self.find(&name)?.is_none() {
            if request.mode == UpsertMode::UpdateOnly {
                return Err(SyncError::ThemeNotFound(name));
            }
            self.ensure_rows_free(&name)?;
        }
        let located = self.locate(&name)?;
        let row = located.index;

        let mut channels = Vec::new();
        if mode == MappingMode::Indirect {
            channels = self.resolve_indirect_channels(row, &mut warnings)?;
        }

        let sibling = if located.is_new {
            self.choose_sibling(&name, row)
        } else {
            None
        };

        self.align_store(StoreKind::Primary, row, &name, located.id, located.is_new, &mut warnings)?;
        let companion_id = self
            .companion
            .primary()
            .and_then(|sheet| next_id(sheet, &self.config.companion.id_column));
        self.align_store(StoreKind::Companion, row, &name, companion_id, located.is_new, &mut warnings)?;

        let mut series = Vec::new();
        if let Some(sibling) = &sibling {
            series = self.inherit_series(sibling, row, &mut warnings)?;
        }

        let fields = self.synchronize_groups(mode, &flags, row, located.is_new, &mut warnings)?;

        let primary_sheet = self.primary.primary_sheet_name().to_string();
        if let Some(sheet) = self.primary.sheet_mut(&primary_sheet) {
            channels.extend(fill_channel_defaults(sheet, row)?);
        }

        let ordering = match (located.is_new, located.id) {
            (true, Some(id)) => self.order_new_theme(&name, id, sibling.as_ref(), &mut warnings)?,
            _ => OrderingOutcome::Skipped,
        };

        for warning in &warnings {
            log::warn!("{warning}");
        }
        log::info!(
            "theme `{name}` {} at row {row}",
            if located.is_new { "created" } else { "updated" }
        );

        Ok(SyncReport {
            theme_name: name,
            mode,
            row_index: row,
            is_new: located.is_new,
            record_id: located.id,
            channels,
            fields,
            sibling,
            series,
            ordering,
            warnings,
        })
    }

    /// Write the working sheets back into their documents.
    pub fn into_documents(self) -> Result<AssembledStores, SyncError> {
        Ok(AssembledStores {
            primary: self.primary.assemble()?,
            companion: self.companion.assemble()?,
        })
    }

    fn resolve_indirect_channels(
        &mut self,
        row: usize,
        warnings: &mut Vec<SyncWarning>,
    ) -> Result<Vec<crate::channels::ChannelOutcome>, SyncError> {
        let Some(color_sheet) = source_color_sheet(&self.source) else {
            log::warn!("source `{}` has no sheets; channels get defaults", self.source.name());
            return Ok(Vec::new());
        };
        let source = ColorSource::new(color_sheet);
        let sheet_name = self.primary.primary_sheet_name().to_string();
        let Some(target) = self.primary.sheet_mut(&sheet_name) else {
            return Ok(Vec::new());
        };

        let resolution = resolve_channels(target, row, &self.config.channel_mapping, &source)?;
        warnings.extend(resolution.invalid_colors.into_iter().map(|invalid| {
            SyncWarning::InvalidColorValue {
                channel: invalid.channel,
                source_code: invalid.source_code,
            }
        }));
        warnings.extend(resolution.missing_columns.into_iter().map(|column| {
            SyncWarning::MissingKeyColumn {
                sheet: sheet_name.clone(),
                column,
            }
        }));
        Ok(resolution.outcomes)
    }

    fn choose_sibling(&self, name: &str, row: usize) -> Option<SiblingCandidate> {
        let layout = &self.config.primary;
        let sheet = self.primary.primary()?;
        let candidates = find_siblings(sheet, &layout.key_column, &layout.id_column, name, row);
        let chosen = self.sibling_policy.choose(&candidates).cloned();
        match &chosen {
            Some(sibling) => log::info!(
                "`{name}` joins the series of `{}` (row {}, {} candidate(s))",
                sibling.name,
                sibling.row_index,
                candidates.len()
            ),
            None => log::debug!("`{name}` has no series sibling"),
        }
        chosen
    }

    /// Give every allow-listed sheet of `store` a row at `row`.
    fn align_store(
        &mut self,
        store: StoreKind,
        row: usize,
        name: &str,
        id: Option<i64>,
        is_new: bool,
        warnings: &mut Vec<SyncWarning>,
    ) -> Result<(), SyncError> {
        let layout = self.config.layout(store).clone();
        let stamp = RowStamp {
            key_column: &layout.key_column,
            id_column: &layout.id_column,
            name,
            id,
        };

        let ws = self.store_mut(store);
        let mut sheets = Vec::new();
        if store == StoreKind::Companion {
            sheets.push(ws.primary_sheet_name().to_string());
        }
        sheets.extend(layout.auxiliary_sheets.iter().cloned());

        for sheet_name in sheets {
            let Some(sheet) = ws.sheet_mut(&sheet_name) else {
                warnings.push(SyncWarning::MissingSheet {
                    store,
                    sheet: sheet_name,
                });
                continue;
            };
            let alignment: Alignment = align_row(sheet, row, &stamp)?;
            if alignment.shortfall() > 0 {
                warnings.push(SyncWarning::RowAlignmentShortfall {
                    sheet: sheet_name.clone(),
                    padded_rows: alignment.shortfall(),
                });
            }
            if is_new && !alignment.created_target && !sheet.is_empty() {
                stamp_row(sheet, row, &stamp)?;
            }
        }
        Ok(())
    }

    /// Refuse to create `name` when its future row already holds another theme
    /// in any aligned sheet.
    fn ensure_rows_free(&self, name: &str) -> Result<(), SyncError> {
        let Some(row) = self.primary.primary().map(Sheet::len) else {
            return Ok(());
        };
        for store in [StoreKind::Primary, StoreKind::Companion] {
            let layout = self.config.layout(store);
            let ws = self.store(store);
            let mut sheets = Vec::new();
            if store == StoreKind::Companion {
                sheets.push(ws.primary_sheet_name());
            }
            sheets.extend(layout.auxiliary_sheets.iter().map(String::as_str));

            for sheet_name in sheets {
                let Some(sheet) = ws.sheet(sheet_name) else {
                    continue;
                };
                let Some(col) = sheet.column_index(&layout.key_column) else {
                    continue;
                };
                if row >= sheet.len() {
                    continue;
                }
                let occupant = sheet.cell(row, col).trim();
                if !occupant.is_empty() && occupant != name {
                    return Err(SyncError::RowOccupied {
                        store,
                        sheet: sheet_name.to_string(),
                        row,
                        occupant: occupant.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_store_alignment(&self, warnings: &mut Vec<SyncWarning>) {
        let (Some(primary), Some(companion)) = (self.primary.primary(), self.companion.primary())
        else {
            return;
        };
        if primary.len() != companion.len() {
            warnings.push(SyncWarning::StoreMisaligned {
                primary_rows: primary.len(),
                companion_rows: companion.len(),
            });
        }
    }

    fn inherit_series(
        &mut self,
        sibling: &SiblingCandidate,
        row: usize,
        warnings: &mut Vec<SyncWarning>,
    ) -> Result<Vec<crate::series::SeriesCopy>, SyncError> {
        let sheet_name = self.companion.primary_sheet_name().to_string();
        let Some(sheet) = self.companion.sheet_mut(&sheet_name) else {
            return Ok(Vec::new());
        };
        if sibling.row_index >= sheet.len() {
            log::warn!(
                "sibling row {} is beyond companion sheet `{sheet_name}`; nothing inherited",
                sibling.row_index
            );
            return Ok(Vec::new());
        }
        let transfer = copy_series_columns(sheet, sibling.row_index, row, &self.config.series.columns)?;
        warnings.extend(transfer.missing_columns.into_iter().map(|column| {
            SyncWarning::MissingKeyColumn {
                sheet: sheet_name.clone(),
                column,
            }
        }));
        Ok(transfer.copied)
    }

    fn synchronize_groups(
        &mut self,
        mode: MappingMode,
        flags: &StatusFlags,
        row: usize,
        is_new: bool,
        warnings: &mut Vec<SyncWarning>,
    ) -> Result<Vec<crate::sync::FieldOutcome>, SyncError> {
        let mut outcomes = Vec::new();
        if mode == MappingMode::Indirect && !is_new {
            log::debug!("indirect update; field groups keep their current values");
            return Ok(outcomes);
        }

        let groups = self.config.field_groups.clone();
        for group in &groups {
            if mode == MappingMode::Indirect && group.channel_columns {
                continue;
            }
            let ws = match group.store {
                StoreKind::Primary => &mut self.primary,
                StoreKind::Companion => &mut self.companion,
            };
            let sheet_name = group
                .sheet
                .clone()
                .unwrap_or_else(|| ws.primary_sheet_name().to_string());
            let Some(target) = ws.sheet(&sheet_name) else {
                warnings.push(SyncWarning::MissingSheet {
                    store: group.store,
                    sheet: sheet_name,
                });
                continue;
            };

            let specs = group.specs(target.header());
            let mut selections: BTreeMap<String, Selection> = specs
                .iter()
                .map(|spec| {
                    let selection = match mode {
                        MappingMode::Direct => select_field(
                            flags,
                            &group.name,
                            &spec.column,
                            &SelectionContext {
                                source: self.source.sheet(&group.name),
                                target: Some(target),
                                row_index: row,
                                is_new,
                            },
                        ),
                        MappingMode::Indirect => current_value(target, row, &spec.column),
                    };
                    (spec.column.clone(), selection)
                })
                .collect();

            let Some(target) = ws.sheet_mut(&sheet_name) else {
                log::warn!("{} sheet `{sheet_name}` is not allow-listed; group `{}` skipped", group.store, group.name);
                continue;
            };
            let synced = synchronize_fields(target, row, &group.name, &specs, |spec| {
                selections
                    .remove(&spec.column)
                    .unwrap_or(Selection::NoOpinion)
            })?;
            warnings.extend(synced.missing_columns.into_iter().map(|column| {
                SyncWarning::MissingKeyColumn {
                    sheet: sheet_name.clone(),
                    column,
                }
            }));
            outcomes.extend(synced.outcomes);
        }
        Ok(outcomes)
    }

    fn order_new_theme(
        &mut self,
        name: &str,
        id: i64,
        sibling: Option<&SiblingCandidate>,
        warnings: &mut Vec<SyncWarning>,
    ) -> Result<OrderingOutcome, SyncError> {
        let Some(cfg) = self.config.ordering.clone() else {
            return Ok(OrderingOutcome::Skipped);
        };
        let Some(sheet) = self.store_mut(cfg.store).sheet_mut(&cfg.sheet) else {
            warnings.push(SyncWarning::MissingSheet {
                store: cfg.store,
                sheet: cfg.sheet.clone(),
            });
            return Ok(OrderingOutcome::Skipped);
        };

        let order = id - 1;
        let appended = match append_order_row(sheet, &cfg, order, name) {
            Ok(index) => index,
            Err(err) => {
                warnings.push(SyncWarning::SortedInsertionRejected {
                    sheet: cfg.sheet.clone(),
                    reason: err.to_string(),
                });
                return Ok(OrderingOutcome::Skipped);
            }
        };
        let appended_outcome = OrderingOutcome::Appended {
            row_index: appended,
            order,
        };

        let Some(predecessor) = sibling.and_then(|s| s.id).map(|sid| sid - 1) else {
            return Ok(appended_outcome);
        };
        match insert_sorted(sheet, &cfg, order, name, predecessor) {
            Ok(slot) => Ok(OrderingOutcome::Inserted {
                row_index: slot,
                order,
                predecessor,
            }),
            Err(OrderingError::PredecessorMissing(predecessor)) => {
                warnings.push(SyncWarning::SortedInsertionTargetMissing {
                    sheet: cfg.sheet.clone(),
                    predecessor,
                });
                Ok(appended_outcome)
            }
            Err(err) => {
                warnings.push(SyncWarning::SortedInsertionRejected {
                    sheet: cfg.sheet.clone(),
                    reason: err.to_string(),
                });
                Ok(appended_outcome)
            }
        }
    }
}

fn workspace(config: &SyncConfig, store: StoreKind, document: Document) -> Result<StoreWorkspace, SyncError> {
    let layout = config.layout(store);
    let primary_sheet = layout
        .primary_sheet_name(&document)
        .ok_or(SyncError::EmptyStore(store))?;
    let mut extra = layout.auxiliary_sheets.clone();
    if let Some(ordering) = &config.ordering {
        if ordering.store == store {
            extra.push(ordering.sheet.clone());
        }
    }
    StoreWorkspace::new(store, document, primary_sheet, extra)
}

fn current_value(sheet: &Sheet, row: usize, column: &str) -> Selection {
    let value = sheet
        .column_index(column)
        .map(|col| sheet.cell(row, col).trim())
        .unwrap_or("");
    if value.is_empty() {
        Selection::NoOpinion
    } else {
        Selection::Existing(value.to_string())
    }
}
