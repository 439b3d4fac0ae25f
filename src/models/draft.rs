//! Budget draft models.
//!
//! A [`BudgetDraft`] is the explicit value behind a budget editing
//! session. The caller owns the edit loop: mutate the draft, then ask it
//! for a fresh [`BudgetBreakdown`]. Values copied from the catalog
//! (unit prices, leg totals and stages, tax percentages) are snapshots
//! taken at selection time and are only replaced by an explicit refresh.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{compute_breakdown, explain_breakdown};
use crate::config::Catalog;
use crate::error::{EngineError, EngineResult};
use crate::money::MoneyInput;

use super::{
    Accessory, AccessoryPayload, BreakdownResult, BudgetBreakdown, BudgetItemPayload,
    BudgetPayload, CatalogId, LogisticsLeg, LogisticsPayload, LogisticsStage, MachineBase,
    SavedBudget, Tax, TaxPayload,
};

/// Logistics selections keyed by leg id.
pub type LogisticsSelections = BTreeMap<CatalogId, LogisticsSelection>;

/// Tax selections keyed by tax id.
pub type TaxSelections = BTreeMap<CatalogId, TaxSelection>;

/// Clamps a user-entered quantity to the minimum of 1.
///
/// # Example
///
/// ```
/// use budget_engine::models::clamp_quantity;
///
/// assert_eq!(clamp_quantity(0), 1);
/// assert_eq!(clamp_quantity(-4), 1);
/// assert_eq!(clamp_quantity(3), 3);
/// ```
pub fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

/// An accessory attached to a machine line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryLine {
    /// Accessory id.
    pub accessory_id: CatalogId,
    /// Quantity (at least 1).
    #[serde(alias = "cantidad")]
    pub quantity: u32,
    /// Catalog price captured when the accessory was added.
    pub unit_price: Decimal,
}

impl AccessoryLine {
    /// Creates a line with quantity 1 priced from the catalog.
    pub fn new(accessory: &Accessory) -> Self {
        Self {
            accessory_id: accessory.id,
            quantity: 1,
            unit_price: accessory.total,
        }
    }
}

/// A machine line with its nested accessories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineLine {
    /// Machine id.
    pub machine_base_id: CatalogId,
    /// Quantity (at least 1).
    #[serde(alias = "cantidad")]
    pub quantity: u32,
    /// Catalog price captured when the machine was added.
    pub unit_price: Decimal,
    /// Accessories, in insertion order.
    #[serde(default, alias = "accesorios")]
    pub accessories: Vec<AccessoryLine>,
}

impl MachineLine {
    /// Creates a line with quantity 1 and no accessories.
    pub fn new(machine: &MachineBase) -> Self {
        Self {
            machine_base_id: machine.id,
            quantity: 1,
            unit_price: machine.total,
            accessories: Vec::new(),
        }
    }
}

/// A selected logistics leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogisticsSelection {
    /// Leg id.
    pub logistics_leg_id: CatalogId,
    /// Leg total captured at selection.
    pub total: MoneyInput,
    /// Stage captured at selection.
    pub stage: LogisticsStage,
}

impl LogisticsSelection {
    /// Captures the current catalog values of a leg.
    pub fn capture(leg: &LogisticsLeg) -> Self {
        Self {
            logistics_leg_id: leg.id,
            total: MoneyInput::Amount(leg.total),
            stage: leg.stage,
        }
    }
}

/// The state of one tax in a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSelection {
    /// Tax id.
    pub tax_id: CatalogId,
    /// Display name captured at selection.
    pub name: String,
    /// Whether the tax contributes to the total.
    pub included: bool,
    /// Percentage override, defaulting to the catalog value.
    pub percentage: MoneyInput,
    /// Minimum amount, displayed only.
    #[serde(default)]
    pub minimum_amount: Option<Decimal>,
}

impl TaxSelection {
    /// Captures the current catalog values of a tax.
    ///
    /// The selection starts included when the tax is flagged
    /// `always_include`.
    pub fn capture(tax: &Tax) -> Self {
        Self {
            tax_id: tax.id,
            name: tax.name.clone(),
            included: tax.always_include,
            percentage: MoneyInput::Amount(tax.percentage),
            minimum_amount: tax.minimum_amount,
        }
    }
}

/// Unit price overrides, one per machine or accessory id.
///
/// Every line referencing the same id shares the override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOverrides {
    /// Machine price by machine id.
    #[serde(default)]
    pub machines: BTreeMap<CatalogId, MoneyInput>,
    /// Accessory price by accessory id.
    #[serde(default)]
    pub accessories: BTreeMap<CatalogId, MoneyInput>,
}

impl PriceOverrides {
    /// Resolves the unit price of a machine line.
    ///
    /// An override wins over the line's catalog price; an unparsable
    /// override counts as zero.
    pub fn machine_unit_price(&self, line: &MachineLine) -> Decimal {
        self.machines
            .get(&line.machine_base_id)
            .map_or(line.unit_price, MoneyInput::amount_or_zero)
    }

    /// Resolves the unit price of an accessory line.
    pub fn accessory_unit_price(&self, line: &AccessoryLine) -> Decimal {
        self.accessories
            .get(&line.accessory_id)
            .map_or(line.unit_price, MoneyInput::amount_or_zero)
    }
}

/// A budget being edited.
///
/// # Example
///
/// ```
/// use budget_engine::models::{BudgetDraft, MachineBase};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let excavator = MachineBase {
///     id: 1,
///     name: "Excavator 20t".to_string(),
///     total: Decimal::new(100, 0),
/// };
///
/// let mut draft = BudgetDraft::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
/// let line = draft.add_machine_line(&excavator);
/// draft.set_machine_quantity(line, 2).unwrap();
///
/// assert_eq!(draft.breakdown().grand_total, Decimal::new(200, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetDraft {
    /// Budget date.
    pub date: NaiveDate,
    /// Machine lines, in insertion order.
    #[serde(default)]
    pub lines: Vec<MachineLine>,
    /// Selected logistics legs.
    #[serde(default)]
    pub logistics: LogisticsSelections,
    /// Every known tax and whether it is included.
    #[serde(default)]
    pub taxes: TaxSelections,
    /// Unit price overrides.
    #[serde(default)]
    pub overrides: PriceOverrides,
}

impl BudgetDraft {
    /// Creates an empty draft.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            lines: Vec::new(),
            logistics: LogisticsSelections::new(),
            taxes: TaxSelections::new(),
            overrides: PriceOverrides::default(),
        }
    }

    /// Seeds one selection per catalog tax.
    pub fn with_catalog_taxes<'a>(mut self, taxes: impl IntoIterator<Item = &'a Tax>) -> Self {
        self.taxes = taxes
            .into_iter()
            .map(|tax| (tax.id, TaxSelection::capture(tax)))
            .collect();
        self
    }

    /// Appends a machine line and returns its index.
    ///
    /// The first time a machine id appears, its catalog price seeds the
    /// shared override.
    pub fn add_machine_line(&mut self, machine: &MachineBase) -> usize {
        self.overrides
            .machines
            .entry(machine.id)
            .or_insert(MoneyInput::Amount(machine.total));
        self.lines.push(MachineLine::new(machine));
        self.lines.len() - 1
    }

    /// Removes a machine line together with its accessories.
    pub fn remove_machine_line(&mut self, index: usize) -> EngineResult<MachineLine> {
        if index >= self.lines.len() {
            return Err(EngineError::LineNotFound { index });
        }
        Ok(self.lines.remove(index))
    }

    /// Attaches an accessory to an existing machine line.
    pub fn add_accessory(&mut self, line_index: usize, accessory: &Accessory) -> EngineResult<()> {
        let line = self.line_mut(line_index)?;
        line.accessories.push(AccessoryLine::new(accessory));
        self.overrides
            .accessories
            .entry(accessory.id)
            .or_insert(MoneyInput::Amount(accessory.total));
        Ok(())
    }

    /// Detaches an accessory from a machine line.
    pub fn remove_accessory(
        &mut self,
        line_index: usize,
        accessory_index: usize,
    ) -> EngineResult<AccessoryLine> {
        let line = self.line_mut(line_index)?;
        if accessory_index >= line.accessories.len() {
            return Err(EngineError::LineNotFound {
                index: accessory_index,
            });
        }
        Ok(line.accessories.remove(accessory_index))
    }

    /// Sets a machine line quantity, clamped to at least 1.
    pub fn set_machine_quantity(&mut self, index: usize, quantity: i64) -> EngineResult<u32> {
        let line = self.line_mut(index)?;
        line.quantity = clamp_quantity(quantity);
        Ok(line.quantity)
    }

    /// Sets an accessory quantity, clamped to at least 1.
    pub fn set_accessory_quantity(
        &mut self,
        line_index: usize,
        accessory_index: usize,
        quantity: i64,
    ) -> EngineResult<u32> {
        let line = self.line_mut(line_index)?;
        let accessory = line
            .accessories
            .get_mut(accessory_index)
            .ok_or(EngineError::LineNotFound {
                index: accessory_index,
            })?;
        accessory.quantity = clamp_quantity(quantity);
        Ok(accessory.quantity)
    }

    /// Overrides the unit price of every line of a machine.
    pub fn set_machine_price(&mut self, machine_id: CatalogId, price: impl Into<MoneyInput>) {
        self.overrides.machines.insert(machine_id, price.into());
    }

    /// Overrides the unit price of every line of an accessory.
    pub fn set_accessory_price(&mut self, accessory_id: CatalogId, price: impl Into<MoneyInput>) {
        self.overrides.accessories.insert(accessory_id, price.into());
    }

    /// Selects or deselects a logistics leg; returns whether it is now selected.
    pub fn toggle_leg(&mut self, leg: &LogisticsLeg) -> bool {
        if self.logistics.remove(&leg.id).is_some() {
            return false;
        }
        self.logistics
            .insert(leg.id, LogisticsSelection::capture(leg));
        true
    }

    /// Re-captures total and stage of an already selected leg.
    ///
    /// Returns false when the leg is not selected.
    pub fn refresh_leg(&mut self, leg: &LogisticsLeg) -> bool {
        match self.logistics.get_mut(&leg.id) {
            Some(selection) => {
                *selection = LogisticsSelection::capture(leg);
                true
            }
            None => false,
        }
    }

    /// Includes or excludes a tax.
    pub fn set_tax_included(&mut self, tax_id: CatalogId, included: bool) -> EngineResult<()> {
        let selection = self
            .taxes
            .get_mut(&tax_id)
            .ok_or(EngineError::TaxNotFound { id: tax_id })?;
        selection.included = included;
        Ok(())
    }

    /// Overrides a tax percentage.
    pub fn set_tax_percentage(
        &mut self,
        tax_id: CatalogId,
        percentage: impl Into<MoneyInput>,
    ) -> EngineResult<()> {
        let selection = self
            .taxes
            .get_mut(&tax_id)
            .ok_or(EngineError::TaxNotFound { id: tax_id })?;
        selection.percentage = percentage.into();
        Ok(())
    }

    /// Computes the breakdown of the current draft.
    pub fn breakdown(&self) -> BudgetBreakdown {
        compute_breakdown(&self.lines, &self.logistics, &self.taxes, &self.overrides)
    }

    /// Computes the breakdown with per-tax detail and audit steps.
    pub fn explain(&self) -> BreakdownResult {
        explain_breakdown(&self.lines, &self.logistics, &self.taxes, &self.overrides)
    }

    /// Rebuilds a draft from a saved budget for edit mode.
    ///
    /// Saved unit prices become overrides. A leg's stage comes from the
    /// saved record, else the catalog, else post-customs. Every catalog
    /// tax starts excluded and the saved taxes are applied on top.
    pub fn from_saved(saved: &SavedBudget, catalog: &Catalog) -> Self {
        let mut draft = BudgetDraft::new(saved.date);

        for item in &saved.items {
            let mut line = MachineLine {
                machine_base_id: item.machine_base_id,
                quantity: item.quantity.max(1),
                unit_price: catalog
                    .machine(item.machine_base_id)
                    .map_or(Decimal::ZERO, |m| m.total),
                accessories: Vec::with_capacity(item.accessories.len()),
            };
            if let Some(snapshot) = item.machine_total_snapshot {
                draft
                    .overrides
                    .machines
                    .insert(item.machine_base_id, MoneyInput::Amount(snapshot));
            }

            for saved_accessory in &item.accessories {
                line.accessories.push(AccessoryLine {
                    accessory_id: saved_accessory.accessory_id,
                    quantity: saved_accessory.quantity.max(1),
                    unit_price: catalog
                        .accessory(saved_accessory.accessory_id)
                        .map_or(Decimal::ZERO, |a| a.total),
                });
                if let Some(snapshot) = saved_accessory.accessory_total_snapshot {
                    draft
                        .overrides
                        .accessories
                        .insert(saved_accessory.accessory_id, MoneyInput::Amount(snapshot));
                }
            }

            draft.lines.push(line);
        }

        for saved_leg in &saved.logistics {
            let catalog_leg = catalog.logistics_leg(saved_leg.logistics_leg_id).ok();
            let stage = saved_leg
                .stage
                .or_else(|| catalog_leg.map(|leg| leg.stage))
                .unwrap_or(LogisticsStage::PostCustoms);
            let total = saved_leg
                .total_snapshot
                .or_else(|| catalog_leg.map(|leg| leg.total))
                .unwrap_or(Decimal::ZERO);

            draft.logistics.insert(
                saved_leg.logistics_leg_id,
                LogisticsSelection {
                    logistics_leg_id: saved_leg.logistics_leg_id,
                    total: MoneyInput::Amount(total),
                    stage,
                },
            );
        }

        draft = draft.with_catalog_taxes(catalog.taxes());
        for selection in draft.taxes.values_mut() {
            selection.included = false;
        }

        for saved_tax in &saved.taxes {
            let selection = draft
                .taxes
                .entry(saved_tax.tax_id)
                .or_insert_with(|| TaxSelection {
                    tax_id: saved_tax.tax_id,
                    name: String::new(),
                    included: false,
                    percentage: MoneyInput::Amount(Decimal::ZERO),
                    minimum_amount: None,
                });
            selection.included = saved_tax.included;
            if let Some(percentage) = saved_tax.percentage_snapshot {
                selection.percentage = MoneyInput::Amount(percentage);
            }
            if let Some(name) = &saved_tax.name {
                selection.name = name.clone();
            }
            if saved_tax.minimum_amount_snapshot.is_some() {
                selection.minimum_amount = saved_tax.minimum_amount_snapshot;
            }
        }

        draft
    }

    /// Builds the submission payload with every override resolved.
    ///
    /// Fails with [`EngineError::EmptyBudget`] when there are no machine
    /// lines, and with [`EngineError::InvalidAmount`] when a user-entered
    /// amount cannot be parsed.
    pub fn to_payload(&self) -> EngineResult<BudgetPayload> {
        if self.lines.is_empty() {
            return Err(EngineError::EmptyBudget);
        }

        let items = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| -> EngineResult<BudgetItemPayload> {
                let machine_total = resolve_amount(
                    self.overrides.machines.get(&line.machine_base_id),
                    line.unit_price,
                    || format!("items[{}].machine_total", i),
                )?;

                let accessories = line
                    .accessories
                    .iter()
                    .enumerate()
                    .map(|(j, accessory)| -> EngineResult<AccessoryPayload> {
                        let accessory_total = resolve_amount(
                            self.overrides.accessories.get(&accessory.accessory_id),
                            accessory.unit_price,
                            || format!("items[{}].accessories[{}].accessory_total", i, j),
                        )?;
                        Ok(AccessoryPayload {
                            accessory_id: accessory.accessory_id,
                            quantity: accessory.quantity.max(1),
                            accessory_total,
                        })
                    })
                    .collect::<EngineResult<Vec<_>>>()?;

                Ok(BudgetItemPayload {
                    machine_base_id: line.machine_base_id,
                    quantity: line.quantity.max(1),
                    machine_total,
                    accessories,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let logistics = self
            .logistics
            .values()
            .map(|selection| -> EngineResult<LogisticsPayload> {
                let total = resolve_amount(Some(&selection.total), Decimal::ZERO, || {
                    format!("logistics[{}].total", selection.logistics_leg_id)
                })?;
                Ok(LogisticsPayload {
                    logistics_leg_id: selection.logistics_leg_id,
                    total,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let taxes = self
            .taxes
            .values()
            .map(|selection| -> EngineResult<TaxPayload> {
                let percentage = resolve_amount(Some(&selection.percentage), Decimal::ZERO, || {
                    format!("taxes[{}].percentage", selection.tax_id)
                })?;
                Ok(TaxPayload {
                    tax_id: selection.tax_id,
                    included: selection.included,
                    percentage,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(BudgetPayload {
            date: self.date,
            items,
            logistics,
            taxes,
        })
    }

    fn line_mut(&mut self, index: usize) -> EngineResult<&mut MachineLine> {
        self.lines
            .get_mut(index)
            .ok_or(EngineError::LineNotFound { index })
    }
}

/// Resolves an optional user amount, failing on unparsable text.
fn resolve_amount(
    input: Option<&MoneyInput>,
    fallback: Decimal,
    field: impl FnOnce() -> String,
) -> EngineResult<Decimal> {
    match input {
        None => Ok(fallback),
        Some(value) => value.value().ok_or_else(|| EngineError::InvalidAmount {
            field: field(),
            value: value.to_string(),
        }),
    }
}
