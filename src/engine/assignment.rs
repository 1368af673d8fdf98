use std::collections::HashSet;

use crate::model::{EmployeeId, VariantId, assignment::Assignment, leave_variant::LeaveVariant};

/// Variants visible to `employee_id`, in catalog order.
///
/// When the assignment source holds no rows at all the tenant is treated as
/// unconfigured and every catalog variant is returned. Screens rely on this
/// during initial setup. Once any assignment exists anywhere, an employee
/// without assignments gets an empty result.
pub fn resolve_assigned_variants<'a>(
    employee_id: EmployeeId,
    catalog: &'a [LeaveVariant],
    assignments: &[Assignment],
) -> Vec<&'a LeaveVariant> {
    if assignments.is_empty() {
        tracing::debug!(employee_id, "No assignments configured; treating all variants as assigned");
        return catalog.iter().collect();
    }

    let assigned: HashSet<VariantId> = assignments
        .iter()
        .filter(|a| a.employee_id == employee_id)
        .map(|a| a.leave_variant_id)
        .collect();

    catalog.iter().filter(|v| assigned.contains(&v.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::variant;

    fn assignment(employee_id: EmployeeId, leave_variant_id: VariantId) -> Assignment {
        Assignment {
            employee_id,
            leave_variant_id,
        }
    }

    #[test]
    fn filters_to_employee_assignments_in_catalog_order() {
        let catalog = vec![variant(1, "1", "Casual"), variant(2, "2", "Sick"), variant(3, "3", "Annual")];
        let assignments = vec![assignment(7, 3), assignment(7, 1), assignment(8, 2)];

        let ids: Vec<_> = resolve_assigned_variants(7, &catalog, &assignments)
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn unconfigured_tenant_sees_whole_catalog() {
        let catalog = vec![variant(1, "1", "Casual"), variant(2, "2", "Sick")];
        assert_eq!(resolve_assigned_variants(7, &catalog, &[]).len(), 2);
    }

    #[test]
    fn employee_without_assignments_gets_nothing_once_tenant_is_configured() {
        let catalog = vec![variant(1, "1", "Casual"), variant(2, "2", "Sick")];
        let assignments = vec![assignment(8, 2)];
        assert!(resolve_assigned_variants(7, &catalog, &assignments).is_empty());
    }

    #[test]
    fn assignment_to_unknown_variant_is_ignored() {
        let catalog = vec![variant(1, "1", "Casual")];
        let assignments = vec![assignment(7, 42)];
        assert!(resolve_assigned_variants(7, &catalog, &assignments).is_empty());
    }
}
