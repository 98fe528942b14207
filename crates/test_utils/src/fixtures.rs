//! Pre-built Test Fixtures
//!
//! Ready-to-use scopes and documents. Every document fixture comes with
//! the values the extractor is expected to pull out of it.

use core_kernel::{HospitalId, TenantId};

/// Fixture for tenant and hospital scopes
pub struct ScopeFixtures;

impl ScopeFixtures {
    pub fn tenant() -> TenantId {
        TenantId::parse("tenant-apollo").unwrap()
    }

    /// A second tenant for isolation tests
    pub fn other_tenant() -> TenantId {
        TenantId::parse("tenant-fortis").unwrap()
    }

    pub fn hospital() -> HospitalId {
        HospitalId::parse("hosp-chennai-01").unwrap()
    }
}

/// Fixture for uploaded documents
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// A well-formed denial export with one data row
    pub fn denial_csv() -> &'static str {
        "Claim No,Patient Name,Hospital Name,Claim Amount,Denied Amount,Denial Reason\n\
         CLM-2024-001,Ravi Kumar,Star Health TPA,125000.00,40000.00,Pre-existing condition\n"
    }

    /// The same denial, with synonym headers and messier amounts
    pub fn synonym_csv() -> &'static str {
        "claimno,member_name,provider,bill_amount,rejected_amount,remarks\r\n\
         CLM-2024-001,ravi kumar,STAR HEALTH TPA,Rs. 125000,₹40000,Pre-existing condition\r\n"
    }

    /// Headers only
    pub fn header_only_csv() -> &'static str {
        "claim_no,patient_name,reason\n"
    }

    /// Text lines of a scanned denial letter
    ///
    /// Name lines are followed by numbered lines; a name capture runs on
    /// until a digit stops it.
    pub fn denial_letter_lines() -> Vec<&'static str> {
        vec![
            "STAR HEALTH AND ALLIED INSURANCE",
            "Claim Number: CLM/2024/7788",
            "Policy No: POL-55123",
            "1. Patient Name: Meena Iyer",
            "2. Hospital Name: Apollo Hospitals",
            "3. Admission Date: 02/01/2024",
            "4. Discharge Date: 06/01/2024",
            "Claim Amount: Rs. 2,40,000.00",
            "Denied Amount: Rs. 60,000.00",
            "Denial Reason: Treatment not covered under policy",
        ]
    }

    /// Text lines with no recognisable field
    pub fn unreadable_letter_lines() -> Vec<&'static str> {
        vec!["@@@@", "#### ####"]
    }

    /// Leading bytes of a legacy Excel workbook
    pub fn spreadsheet_bytes() -> Vec<u8> {
        let mut bytes = vec![0xd0, 0xcf, 0x11, 0xe0, 0xa1, 0xb1, 0x1a, 0xe1];
        bytes.resize(512, 0);
        bytes
    }
}

/// Content types the extractor dispatches on
pub struct ContentTypes;

impl ContentTypes {
    pub const PDF: &'static str = "application/pdf";
    pub const CSV: &'static str = "text/csv";
    pub const XLS: &'static str = "application/vnd.ms-excel";
    pub const XLSX: &'static str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
}
