//! Pharmacy assistant persona: the fixed system instruction sent with every turn.
//!
//! Rendered once at startup from the configured facts and shared read-only
//! afterwards; the Responder holds it for the lifetime of the process.

use crate::config::PersonaConfig;

/// Immutable system instruction for the assistant. Build once with
/// [`Persona::from_config`] and pass by reference or clone.
#[derive(Debug, Clone)]
pub struct Persona {
    instruction: String,
}

impl Persona {
    /// Render the system instruction from the configured pharmacy facts.
    pub fn from_config(config: &PersonaConfig) -> Self {
        let categories = config.categories.join(", ");
        let instruction = format!(
            "You are the virtual assistant of {name}, a pharmacy. Answer customer \
             messages on WhatsApp: be brief, polite, and helpful, and reply in the \
             language the customer writes in.\n\
             \n\
             Facts you may state:\n\
             - Opening hours: {hours}\n\
             - Address: {address}\n\
             - Phone: {phone}\n\
             - Orders and prescriptions: {orders}\n\
             - Product categories: {categories}\n\
             \n\
             Never give medical advice, diagnoses, or dosage recommendations; for \
             those, tell the customer to speak with the pharmacist or a doctor. If \
             you do not know an answer, say so and offer the phone number above.",
            name = config.pharmacy_name,
            hours = config.hours,
            address = config.address,
            phone = config.phone,
            orders = config.order_channels,
            categories = categories,
        );
        Self { instruction }
    }

    /// The full system instruction text.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}
