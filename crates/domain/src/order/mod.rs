//! Orders and the lines they own.
//!
//! An order and its lines form one aggregate: they are written and removed
//! together and never observed apart.

mod service;

pub use service::OrderService;

use chrono::NaiveDate;
use common::{EntityId, Identifiable, Money, OrderDto, OrderLineDto};
use store::{AggregateRecord, Entity};

use crate::credit_card::CreditCard;
use crate::validation::{CheckError, Validatable, require_text};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An order together with its lines.
pub type OrderRecord = AggregateRecord<Order, OrderLine>;

/// Name and address the order ships to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Validatable for ShippingAddress {
    fn check_data(&self) -> Result<(), CheckError> {
        require_text("first_name", &self.first_name, "Invalid first name")?;
        require_text("last_name", &self.last_name, "Invalid last name")?;
        require_text("street1", &self.street1, "Invalid street")?;
        require_text("city", &self.city, "Invalid city")?;
        require_text("state", &self.state, "Invalid state")?;
        require_text("zip_code", &self.zip_code, "Invalid zip code")?;
        require_text("country", &self.country, "Invalid country")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: EntityId,
    /// Stamped when the order is persisted.
    pub order_date: Option<NaiveDate>,
    pub customer_id: EntityId,
    pub shipping: ShippingAddress,
    /// `None` when paid by another instrument.
    pub credit_card: Option<CreditCard>,
}

impl Identifiable for Order {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Order {
    const NAME: &'static str = "Order";
}

impl Validatable for Order {
    fn check_data(&self) -> Result<(), CheckError> {
        self.shipping.check_data()?;
        require_text("customer", self.customer_id.as_str(), "Invalid customer")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub id: EntityId,
    pub quantity: u32,
    /// Copied from the item when the order is created.
    pub unit_price: Money,
    pub item_id: EntityId,
}

impl Identifiable for OrderLine {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for OrderLine {
    const NAME: &'static str = "OrderLine";
}

impl Validatable for OrderLine {
    fn check_data(&self) -> Result<(), CheckError> {
        if self.quantity == 0 {
            return Err(CheckError::new("quantity", "Invalid quantity"));
        }
        require_text("item", self.item_id.as_str(), "Invalid item")
    }
}

impl Validatable for OrderRecord {
    fn check_data(&self) -> Result<(), CheckError> {
        self.root.check_data()?;
        if self.children.is_empty() {
            return Err(CheckError::new("order_lines", "Invalid order lines"));
        }
        self.children.iter().try_for_each(Validatable::check_data)
    }
}

impl From<&OrderDto> for Order {
    fn from(dto: &OrderDto) -> Self {
        Self {
            id: EntityId::new(dto.id.trim()),
            order_date: NaiveDate::parse_from_str(dto.order_date.trim(), DATE_FORMAT).ok(),
            customer_id: EntityId::new(dto.customer_id.trim()),
            shipping: ShippingAddress {
                first_name: dto.first_name.clone(),
                last_name: dto.last_name.clone(),
                street1: dto.street1.clone(),
                street2: dto.street2.clone(),
                city: dto.city.clone(),
                state: dto.state.clone(),
                zip_code: dto.zip_code.clone(),
                country: dto.country.clone(),
            },
            credit_card: CreditCard::from_fields(
                &dto.credit_card_type,
                &dto.credit_card_number,
                &dto.credit_card_expiry_date,
            ),
        }
    }
}

impl From<&OrderLineDto> for OrderLine {
    fn from(dto: &OrderLineDto) -> Self {
        Self {
            id: EntityId::new(dto.id.trim()),
            // Negative quantities fail the same rule as zero
            quantity: u32::try_from(dto.quantity).unwrap_or(0),
            unit_price: dto.unit_price,
            item_id: EntityId::new(dto.item_id.trim()),
        }
    }
}

impl From<&OrderLine> for OrderLineDto {
    fn from(line: &OrderLine) -> Self {
        Self {
            id: line.id.to_string(),
            quantity: i32::try_from(line.quantity).unwrap_or(i32::MAX),
            unit_price: line.unit_price,
            item_id: line.item_id.to_string(),
        }
    }
}

/// Builds an unsaved aggregate from a transfer object.
pub fn record_from_dto(dto: &OrderDto) -> OrderRecord {
    OrderRecord::new(
        Order::from(dto),
        dto.order_lines.iter().map(OrderLine::from).collect(),
    )
}

/// Flattens an aggregate into its transfer object.
pub fn record_to_dto(record: &OrderRecord) -> OrderDto {
    let order = &record.root;
    let shipping = &order.shipping;
    let card = order.credit_card.clone().unwrap_or_else(|| CreditCard::new("", "", ""));

    OrderDto {
        id: order.id.to_string(),
        order_date: order
            .order_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        first_name: shipping.first_name.clone(),
        last_name: shipping.last_name.clone(),
        street1: shipping.street1.clone(),
        street2: shipping.street2.clone(),
        city: shipping.city.clone(),
        state: shipping.state.clone(),
        zip_code: shipping.zip_code.clone(),
        country: shipping.country.clone(),
        credit_card_type: card.card_type,
        credit_card_number: card.number,
        credit_card_expiry_date: card.expiry_date,
        customer_id: order.customer_id.to_string(),
        order_lines: record.children.iter().map(OrderLineDto::from).collect(),
    }
}
