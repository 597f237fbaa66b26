use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use surety_common::{Amount, FlightKey, Principal, Result, SuretyError};

use crate::config::InsuranceTerms;

/// A passenger's cover on one flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePolicy {
    pub id: Uuid,
    pub passenger: Principal,
    pub key: FlightKey,
    pub premium: Amount,
    pub credited: bool,
}

/// Policies per flight and payouts owed to passengers.
#[derive(Debug, Default, Clone)]
pub struct InsuranceBook {
    policies: HashMap<FlightKey, Vec<InsurancePolicy>>,
    credits: HashMap<Principal, Amount>,
}

impl InsuranceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buy(
        &mut self,
        terms: &InsuranceTerms,
        passenger: Principal,
        key: FlightKey,
        premium: Amount,
    ) -> Result<&InsurancePolicy> {
        if premium == 0 {
            return Err(SuretyError::InvalidInput("premium must be positive".into()));
        }
        if premium > terms.max_premium {
            return Err(SuretyError::InvalidInput(format!(
                "premium {} exceeds the maximum of {}",
                premium, terms.max_premium
            )));
        }

        let policies = self.policies.entry(key.clone()).or_default();
        if policies.iter().any(|p| p.passenger == passenger) {
            return Err(SuretyError::AlreadyRegistered(format!(
                "{} is already insured on {}",
                passenger, key
            )));
        }

        policies.push(InsurancePolicy {
            id: Uuid::new_v4(),
            passenger,
            key,
            premium,
            credited: false,
        });
        // Just pushed
        Ok(&policies[policies.len() - 1])
    }

    /// Credits every policy of the flight that has not been paid yet.
    /// Returns `(passenger, amount)` for each new credit.
    pub fn credit_flight(&mut self, terms: &InsuranceTerms, key: &FlightKey) -> Vec<(Principal, Amount)> {
        let mut paid = Vec::new();
        let Some(policies) = self.policies.get_mut(key) else {
            return paid;
        };

        for policy in policies.iter_mut().filter(|p| !p.credited) {
            let amount = terms.payout(policy.premium);
            policy.credited = true;
            let credit = self.credits.entry(policy.passenger.clone()).or_insert(0);
            *credit = credit.saturating_add(amount);
            paid.push((policy.passenger.clone(), amount));
        }
        paid
    }

    pub fn credits_of(&self, passenger: &Principal) -> Amount {
        self.credits.get(passenger).copied().unwrap_or(0)
    }

    /// Empties the passenger's balance and returns it.
    pub fn withdraw(&mut self, passenger: &Principal) -> Result<Amount> {
        match self.credits.remove(passenger) {
            Some(amount) if amount > 0 => Ok(amount),
            _ => Err(SuretyError::NotFound(format!("no credit for {}", passenger))),
        }
    }

    pub fn policies_for(&self, key: &FlightKey) -> &[InsurancePolicy] {
        self.policies.get(key).map(|p| p.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_common::ETHER;

    fn key() -> FlightKey {
        FlightKey::new("airline-1", "FL1", 1000)
    }

    #[test]
    fn test_premium_bounds() {
        let terms = InsuranceTerms::default();
        let mut book = InsuranceBook::new();
        let p = Principal::from("p1");

        assert!(book.buy(&terms, p.clone(), key(), 0).is_err());
        assert!(book.buy(&terms, p.clone(), key(), ETHER + 1).is_err());
        assert!(book.buy(&terms, p.clone(), key(), ETHER).is_ok());
        assert!(matches!(
            book.buy(&terms, p, key(), ETHER),
            Err(SuretyError::AlreadyRegistered(_))
        ));
        assert_eq!(book.policies_for(&key()).len(), 1);
    }

    #[test]
    fn test_credit_once_then_withdraw() {
        let terms = InsuranceTerms::default();
        let mut book = InsuranceBook::new();
        book.buy(&terms, Principal::from("p1"), key(), 100).unwrap();
        book.buy(&terms, Principal::from("p2"), key(), 40).unwrap();

        let paid = book.credit_flight(&terms, &key());
        assert_eq!(paid.len(), 2);
        assert_eq!(book.credits_of(&Principal::from("p1")), 150);
        assert_eq!(book.credits_of(&Principal::from("p2")), 60);

        // Already paid
        assert!(book.credit_flight(&terms, &key()).is_empty());
        assert_eq!(book.credits_of(&Principal::from("p1")), 150);

        assert_eq!(book.withdraw(&Principal::from("p1")).unwrap(), 150);
        assert_eq!(book.credits_of(&Principal::from("p1")), 0);
        assert!(matches!(
            book.withdraw(&Principal::from("p1")),
            Err(SuretyError::NotFound(_))
        ));
    }

    #[test]
    fn test_credits_saturate_on_huge_premiums() {
        let terms = InsuranceTerms {
            max_premium: Amount::MAX,
            payout_numerator: 1,
            payout_denominator: 1,
        };
        let mut book = InsuranceBook::new();
        let passenger = Principal::from("whale");
        let other = FlightKey::new("airline-1", "FL2", 1000);

        book.buy(&terms, passenger.clone(), key(), Amount::MAX).unwrap();
        book.buy(&terms, passenger.clone(), other.clone(), Amount::MAX / 2).unwrap();

        book.credit_flight(&terms, &key());
        book.credit_flight(&terms, &other);
        assert_eq!(book.credits_of(&passenger), Amount::MAX);
    }

    #[test]
    fn test_credit_unknown_flight() {
        let mut book = InsuranceBook::new();
        assert!(book.credit_flight(&InsuranceTerms::default(), &key()).is_empty());
    }
}
