//! SMART attribute IDs and smartctl field labels read by the engine.
//!
//! ATA attribute IDs follow the numbering shared by drive firmware and
//! catalogued in smartmontools' `drivedb.h`. IDs above 170 are vendor
//! specific; the vendor that defines the meaning used here is noted.

/// Reallocated_Sector_Ct (all vendors)
pub const ATTR_REALLOCATED_SECTOR_CT: u8 = 5;
/// Power_On_Hours (all vendors)
pub const ATTR_POWER_ON_HOURS: u8 = 9;
/// Erase_Fail_Count (Crucial/Micron)
pub const ATTR_ERASE_FAIL_COUNT: u8 = 172;
/// Wear_Leveling_Count (Samsung, older firmware)
pub const ATTR_WEAR_LEVELING_COUNT_LEGACY: u8 = 173;
/// Wear_Leveling_Count (Samsung)
pub const ATTR_WEAR_LEVELING_COUNT: u8 = 177;
/// Used_Rsvd_Blk_Cnt_Tot (Samsung)
pub const ATTR_USED_RESERVE_BLOCK_COUNT: u8 = 179;
/// Current_Pending_Sector (all vendors)
pub const ATTR_CURRENT_PENDING_SECTOR: u8 = 197;
/// UDMA_CRC_Error_Count (all vendors)
pub const ATTR_UDMA_CRC_ERROR_COUNT: u8 = 199;
/// Percent_Lifetime_Remain (Crucial/Micron)
pub const ATTR_PERCENT_LIFETIME_REMAIN: u8 = 202;
/// Remaining_Lifetime_Perc (OCZ)
pub const ATTR_REMAINING_LIFETIME_PERC: u8 = 209;
/// Total_LBAs_Written (all vendors)
pub const ATTR_TOTAL_LBAS_WRITTEN: u8 = 241;

/// UDMA CRC errors at or above this count mark the cable or port as bad.
pub const UDMA_CRC_ERROR_LIMIT: u64 = 500;

// Information section labels
pub const MODEL_FAMILY: &str = "Model Family";
pub const VENDOR: &str = "Vendor";
pub const PRODUCT: &str = "Product";
pub const DEVICE_MODEL: &str = "Device Model";
pub const MODEL_NUMBER: &str = "Model Number";
pub const SERIAL_NUMBER: &str = "Serial Number";
pub const SERIAL_NUMBER_SCSI: &str = "Serial number";
pub const FIRMWARE_VERSION: &str = "Firmware Version";
pub const REVISION: &str = "Revision";
pub const USER_CAPACITY: &str = "User Capacity";
pub const ROTATION_RATE: &str = "Rotation Rate";
pub const SOLID_STATE_DEVICE: &str = "Solid State Device";

// NVMe labels
pub const NVME_TOTAL_CAPACITY: &str = "Total NVM Capacity";
pub const NVME_NAMESPACE_CAPACITY: &str = "Namespace 1 Size/Capacity";
pub const NVME_POWER_ON_HOURS: &str = "Power On Hours";
pub const NVME_DATA_UNITS_WRITTEN: &str = "Data Units Written";
pub const NVME_PERCENTAGE_USED: &str = "Percentage Used";
pub const NVME_CRITICAL_WARNING: &str = "Critical Warning";
// smartctl prints two spaces after "Warning".
pub const NVME_WARNING_TEMP_TIME: &str = "Warning  Comp. Temperature Time";
pub const NVME_MEDIA_ERRORS: &str = "Media and Data Integrity Errors";

// Section markers
pub const INFORMATION_SECTION: &str = "=== START OF INFORMATION SECTION ===";
pub const ATA_SMART_SECTION: &str = "=== START OF READ SMART DATA SECTION ===";
pub const NVME_SMART_SECTION: &str = "=== START OF SMART DATA SECTION ===";

pub const USB_BRIDGE_MARKER: &str = "Unknown USB bridge";
