//! The customer sign-up form.
//!
//! ```text
//! firstName     ""       required, minlength 3
//! lastName      ""       required, maxlength 50
//! emailGroup             match(email, confirmEmail)
//!   email       ""       required, email
//!   confirmEmail ""      required
//! phone         ""       required while notification == "text"
//! notification  "email"
//! rating        null     range 1..=5
//! sendCatalog   true
//! addresses     [address]
//! ```

use crate::control::{ControlList, Field, Group};
use crate::error::Result;
use crate::form::Form;
use crate::rules::{Condition, ConditionalRule};
use custform_validate::{
    EmailRule, FieldValue, LengthRule, MatchRule, RangeRule, RequiredRule, RuleSpec,
};
use serde_json::json;

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL_GROUP: &str = "emailGroup";
pub const EMAIL: &str = "emailGroup.email";
pub const CONFIRM_EMAIL: &str = "emailGroup.confirmEmail";
pub const PHONE: &str = "phone";
pub const NOTIFICATION: &str = "notification";
pub const RATING: &str = "rating";
pub const SEND_CATALOG: &str = "sendCatalog";
pub const ADDRESSES: &str = "addresses";

/// Notification channel that makes the phone number mandatory.
pub const NOTIFY_BY_TEXT: &str = "text";

/// One entry of the `addresses` list.
pub fn address_group() -> Group {
    Group::new()
        .with_control("addressType", Field::new("home"))
        .with_control("street1", Field::new(""))
        .with_control("street2", Field::new(""))
        .with_control("city", Field::new(""))
        .with_control("state", Field::new(""))
        .with_control("zip", Field::new(""))
}

fn email_group() -> Group {
    Group::new()
        .with_control(
            "email",
            Field::new("")
                .with_validator(RequiredRule::new())
                .with_validator(EmailRule::new()),
        )
        .with_control(
            "confirmEmail",
            Field::new("").with_validator(RequiredRule::new()),
        )
        .with_validator(MatchRule::email())
}

fn phone_rule() -> ConditionalRule {
    ConditionalRule::new(NOTIFICATION, PHONE)
        .when(Condition::Equals(NOTIFY_BY_TEXT.into()))
        .then(vec![RuleSpec::Required])
}

/// Customer form built once per session.
#[derive(Debug, Clone)]
pub struct CustomerForm {
    form: Form,
}

impl CustomerForm {
    pub fn new() -> Result<Self> {
        let root = Group::new()
            .with_control(
                FIRST_NAME,
                Field::new("")
                    .with_validator(RequiredRule::new())
                    .with_validator(LengthRule::min(3)),
            )
            .with_control(
                LAST_NAME,
                Field::new("")
                    .with_validator(RequiredRule::new())
                    .with_validator(LengthRule::max(50)),
            )
            .with_control(EMAIL_GROUP, email_group())
            .with_control(PHONE, Field::new(""))
            .with_control(NOTIFICATION, Field::new("email"))
            .with_control(
                RATING,
                Field::new(FieldValue::Null).with_validator(RangeRule::new(1.0, 5.0)),
            )
            .with_control(SEND_CATALOG, Field::new(true))
            .with_control(ADDRESSES, ControlList::seeded(address_group, 1));

        let form = Form::new(root).with_rule(phone_rule())?;
        Ok(Self { form })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Append a blank address. Returns the new number of addresses.
    pub fn add_address(&mut self) -> Result<usize> {
        self.form.push_group(ADDRESSES)
    }

    /// The user picked a notification channel.
    pub fn set_notification(&mut self, via: &str) -> Result<()> {
        self.form.input(NOTIFICATION, via)
    }

    /// Fill in sample values for manual testing.
    pub fn populate_test_data(&mut self) -> Result<()> {
        self.form.patch_value(&json!({
            FIRST_NAME: "Sean",
            LAST_NAME: "Thornber",
            SEND_CATALOG: false,
        }))
    }

    pub fn email(&self) -> Result<&Field> {
        self.form.field(EMAIL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custform_validate::ErrorKind;

    #[test]
    fn default_snapshot() {
        let customer = CustomerForm::new().unwrap();
        assert_eq!(
            customer.form().value(),
            json!({
                "firstName": "",
                "lastName": "",
                "emailGroup": {"email": "", "confirmEmail": ""},
                "phone": "",
                "notification": "email",
                "rating": null,
                "sendCatalog": true,
                "addresses": [{
                    "addressType": "home",
                    "street1": "",
                    "street2": "",
                    "city": "",
                    "state": "",
                    "zip": ""
                }]
            })
        );
    }

    #[test]
    fn initial_validation_state() {
        let customer = CustomerForm::new().unwrap();
        let errors = customer.form().errors();
        assert!(errors.has(FIRST_NAME, &ErrorKind::Required));
        assert!(errors.has(LAST_NAME, &ErrorKind::Required));
        assert!(errors.has(EMAIL, &ErrorKind::Required));
        assert!(errors.has(CONFIRM_EMAIL, &ErrorKind::Required));
        assert!(errors.get(PHONE).is_none());
        assert!(errors.get(RATING).is_none());
        assert!(errors.get(EMAIL_GROUP).is_none());
        assert!(customer.form().field(PHONE).unwrap().validators().is_empty());
    }

    #[test]
    fn populate_test_data_patches_three_fields() {
        let mut customer = CustomerForm::new().unwrap();
        customer.populate_test_data().unwrap();

        let value = customer.form().value();
        assert_eq!(value["firstName"], "Sean");
        assert_eq!(value["lastName"], "Thornber");
        assert_eq!(value["sendCatalog"], false);
        assert_eq!(value["emailGroup"]["email"], "");
        assert!(customer.form().field(FIRST_NAME).unwrap().is_valid());
        assert!(customer.form().field(FIRST_NAME).unwrap().is_pristine());
    }

    #[test]
    fn first_name_min_length() {
        let mut customer = CustomerForm::new().unwrap();
        customer.form_mut().input(FIRST_NAME, "Al").unwrap();
        assert!(customer
            .form()
            .field(FIRST_NAME)
            .unwrap()
            .has_error(&ErrorKind::MinLength));
    }
}
