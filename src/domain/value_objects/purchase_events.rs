use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::plan_types::PlanType;

/// Source tag prepended to order ids when deriving a transaction reference,
/// so retried deliveries of the same order always land on the same key.
pub const STOREFRONT_REF_TAG: &str = "storefront";

const DIRECT_REF_TAG: &str = "direct";

/// Order-status values that allow ingestion to proceed. The storefront
/// reports them either as an English slug or a localized display name.
const COMPLETED_SLUGS: &[&str] = &["completed", "delivered"];
const COMPLETED_NAMES: &[&str] = &["تم التنفيذ", "تم التوصيل"];

/// Normalized purchase record, constructed per request or batch row and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseEvent {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub product_label: String,
    pub sku: Option<String>,
    pub transaction_ref: String,
    /// Set only by the trusted direct-grant shape; otherwise inferred from
    /// the product label.
    pub plan: Option<PlanType>,
}

impl PurchaseEvent {
    pub fn has_contact(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }
}

fn clean_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    (!email.is_empty()).then_some(email)
}

fn clean_phone(raw: &str) -> Option<String> {
    let phone = raw.trim();
    (!phone.is_empty()).then_some(phone.to_string())
}

/// Body of the live ingestion request. The two shapes are distinguished
/// structurally: a direct grant carries an explicit plan, a storefront
/// event wraps the raw order payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PurchaseWebhookBody {
    Direct(DirectGrantRequest),
    Storefront(StorefrontWebhook),
}

/// Trusted direct grant: the caller names the plan, no inference needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectGrantRequest {
    pub email: String,
    pub phone: Option<String>,
    pub plan: PlanType,
    pub transaction_id: Option<String>,
}

impl DirectGrantRequest {
    pub fn into_event(self) -> PurchaseEvent {
        let email = clean_email(&self.email);
        let transaction_ref = self.transaction_id.clone().unwrap_or_else(|| {
            format!(
                "{DIRECT_REF_TAG}-{}-{}",
                email.as_deref().unwrap_or_default(),
                self.plan
            )
        });

        PurchaseEvent {
            email,
            phone: self.phone.as_deref().and_then(clean_phone),
            product_label: self.plan.to_string(),
            sku: None,
            transaction_ref,
            plan: Some(self.plan),
        }
    }
}

// Raw storefront event envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorefrontWebhook {
    pub event: String,
    pub data: StorefrontOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorefrontOrder {
    pub id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub customer: Option<OrderCustomer>,
    pub shipping: Option<OrderShipping>,
    pub items: Option<Vec<OrderItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderStatus {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderCustomer {
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub mobile_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderShipping {
    pub receiver: Option<OrderReceiver>,
    pub pickup_address: Option<OrderReceiver>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderReceiver {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub name: Option<String>,
    pub sku: Option<String>,
}

/// The receiver phone lives in different fields depending on how the order
/// was placed, so extraction is an ordered rule chain rather than one
/// deeply nested access path.
type PhoneRule = fn(&StorefrontOrder) -> Option<String>;

const PHONE_RULES: &[PhoneRule] = &[
    customer_mobile,
    shipping_receiver_phone,
    pickup_receiver_phone,
];

fn customer_mobile(order: &StorefrontOrder) -> Option<String> {
    let customer = order.customer.as_ref()?;
    let mobile = customer.mobile.as_deref().map(str::trim).filter(|m| !m.is_empty())?;
    match customer.mobile_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => Some(format!("{code}{mobile}")),
        None => Some(mobile.to_string()),
    }
}

fn shipping_receiver_phone(order: &StorefrontOrder) -> Option<String> {
    receiver_phone_of(order.shipping.as_ref()?.receiver.as_ref()?)
}

fn pickup_receiver_phone(order: &StorefrontOrder) -> Option<String> {
    receiver_phone_of(order.shipping.as_ref()?.pickup_address.as_ref()?)
}

fn receiver_phone_of(receiver: &OrderReceiver) -> Option<String> {
    receiver
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

impl StorefrontOrder {
    pub fn receiver_phone(&self) -> Option<String> {
        PHONE_RULES.iter().find_map(|rule| rule(self))
    }

    pub fn customer_email(&self) -> Option<String> {
        self.customer
            .as_ref()
            .and_then(|customer| customer.email.as_deref())
            .and_then(clean_email)
    }

    pub fn product_label(&self) -> String {
        self.items
            .as_deref()
            .and_then(|items| items.first())
            .and_then(|item| item.name.clone())
            .unwrap_or_default()
    }

    pub fn product_sku(&self) -> Option<String> {
        self.items
            .as_deref()
            .and_then(|items| items.first())
            .and_then(|item| item.sku.clone())
    }

    /// `None` when the event carries no status field at all; such events
    /// are processed unconditionally.
    pub fn is_completed(&self) -> Option<bool> {
        let status = self.status.as_ref()?;
        let by_slug = status
            .slug
            .as_deref()
            .map(|slug| COMPLETED_SLUGS.contains(&slug.to_lowercase().as_str()));
        let by_name = status
            .name
            .as_deref()
            .map(|name| COMPLETED_NAMES.iter().any(|known| name.contains(known)));

        Some(by_slug.unwrap_or(false) || by_name.unwrap_or(false))
    }

    /// `None` when the order id is missing, in which case no deterministic
    /// transaction reference can be derived.
    pub fn to_purchase_event(&self) -> Option<PurchaseEvent> {
        let order_id = self.id?;

        Some(PurchaseEvent {
            email: self.customer_email(),
            phone: self.receiver_phone(),
            product_label: self.product_label(),
            sku: self.product_sku(),
            transaction_ref: format!("{STOREFRONT_REF_TAG}-{order_id}"),
            plan: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_order() -> StorefrontOrder {
        serde_json::from_value(json!({
            "id": 99120,
            "status": { "name": "تم التنفيذ", "slug": "completed" },
            "customer": {
                "email": "Buyer@Example.COM ",
                "mobile": "551234567",
                "mobile_code": "+966"
            },
            "shipping": {
                "receiver": { "name": "Buyer", "phone": "0551234567" }
            },
            "items": [
                { "name": "اشتراك نصف سنوي", "sku": "SUB-6M" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn customer_mobile_wins_over_shipping_receiver() {
        let order = sample_order();
        assert_eq!(order.receiver_phone().as_deref(), Some("+966551234567"));
    }

    #[test]
    fn falls_back_to_shipping_receiver_phone() {
        let mut order = sample_order();
        order.customer = None;
        assert_eq!(order.receiver_phone().as_deref(), Some("0551234567"));
    }

    #[test]
    fn falls_back_to_pickup_address_phone() {
        let mut order = sample_order();
        order.customer = None;
        order.shipping = Some(OrderShipping {
            receiver: None,
            pickup_address: Some(OrderReceiver {
                name: None,
                phone: Some("0509876543".to_string()),
            }),
        });
        assert_eq!(order.receiver_phone().as_deref(), Some("0509876543"));
    }

    #[test]
    fn derives_deterministic_transaction_ref() {
        let event = sample_order().to_purchase_event().unwrap();
        assert_eq!(event.transaction_ref, "storefront-99120");
        assert_eq!(event.email.as_deref(), Some("buyer@example.com"));
        assert_eq!(event.product_label, "اشتراك نصف سنوي");
    }

    #[test]
    fn missing_order_id_yields_no_event() {
        let mut order = sample_order();
        order.id = None;
        assert!(order.to_purchase_event().is_none());
    }

    #[test]
    fn pending_status_is_not_completed() {
        let mut order = sample_order();
        order.status = Some(OrderStatus {
            name: Some("قيد التنفيذ".to_string()),
            slug: Some("pending".to_string()),
        });
        assert_eq!(order.is_completed(), Some(false));
    }

    #[test]
    fn absent_status_is_indeterminate() {
        let mut order = sample_order();
        order.status = None;
        assert_eq!(order.is_completed(), None);
    }

    #[test]
    fn webhook_body_distinguishes_direct_and_storefront() {
        let direct: PurchaseWebhookBody = serde_json::from_value(json!({
            "email": "a@x.com",
            "plan": "yearly"
        }))
        .unwrap();
        assert!(matches!(direct, PurchaseWebhookBody::Direct(_)));

        let storefront: PurchaseWebhookBody = serde_json::from_value(json!({
            "event": "order.status.updated",
            "data": { "id": 1 }
        }))
        .unwrap();
        assert!(matches!(storefront, PurchaseWebhookBody::Storefront(_)));
    }

    #[test]
    fn direct_grant_without_transaction_id_is_deterministic() {
        let request = DirectGrantRequest {
            email: "A@x.com".to_string(),
            phone: None,
            plan: PlanType::Yearly,
            transaction_id: None,
        };
        let event = request.clone().into_event();
        assert_eq!(event.transaction_ref, "direct-a@x.com-yearly");
        assert_eq!(request.into_event().transaction_ref, event.transaction_ref);
    }
}
