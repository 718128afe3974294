/// One person, one badge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub birth_date: String,
    /// Passport number. Printed on the card and used to find the photo.
    pub passport_number: String,
    pub organization_name: Option<String>,
    pub supplier_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub local_contact_number: Option<String>,
}

impl Record {
    pub fn new(name: &str, birth_date: &str, passport_number: &str) -> Self {
        Record {
            name: name.to_string(),
            birth_date: birth_date.to_string(),
            passport_number: passport_number.to_string(),
            ..Record::default()
        }
    }

    pub fn organization(&self) -> Option<&str> {
        present(&self.organization_name)
    }

    pub fn supplier(&self) -> Option<&str> {
        present(&self.supplier_name)
    }

    pub fn whatsapp(&self) -> Option<&str> {
        present(&self.whatsapp_number)
    }

    pub fn local_contact(&self) -> Option<&str> {
        present(&self.local_contact_number)
    }

    /// Fill the optional fields this record leaves blank from the run-wide values.
    pub fn with_defaults(mut self, defaults: &RunDefaults) -> Self {
        fill(&mut self.organization_name, &defaults.organization_name);
        fill(&mut self.supplier_name, &defaults.supplier_name);
        fill(&mut self.whatsapp_number, &defaults.whatsapp_number);
        fill(&mut self.local_contact_number, &defaults.local_contact_number);
        self
    }
}

/// The four free-text values typed once per run and shared by every card,
/// unless the spreadsheet has its own column for them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunDefaults {
    pub organization_name: Option<String>,
    pub supplier_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub local_contact_number: Option<String>,
}

// Whitespace-only counts as absent.
fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_ref()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn fill(field: &mut Option<String>, default: &Option<String>) {
    if present(field).is_none() {
        *field = present(default).map(str::to_string);
    }
}

#[test]
fn blank_fields_are_absent() {
    let mut record = Record::new("Ali", "1990-01-01", "P123");
    record.supplier_name = Some("   ".to_string());
    record.whatsapp_number = Some(String::new());
    assert_eq!(record.supplier(), None);
    assert_eq!(record.whatsapp(), None);
    assert_eq!(record.organization(), None);
}

#[test]
fn record_values_win_over_defaults() {
    let defaults = RunDefaults {
        organization_name: Some("شركة النور".to_string()),
        supplier_name: Some("مؤسسة".to_string()),
        whatsapp_number: None,
        local_contact_number: Some(" ".to_string()),
    };
    let mut record = Record::new("Ali", "1990-01-01", "P123");
    record.supplier_name = Some("Other".to_string());
    let record = record.with_defaults(&defaults);
    assert_eq!(record.organization(), Some("شركة النور"));
    assert_eq!(record.supplier(), Some("Other"));
    assert_eq!(record.whatsapp(), None);
    assert_eq!(record.local_contact(), None);
}
